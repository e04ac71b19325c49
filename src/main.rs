use std::io::Write;

use tasq::cli::commands::registry;
use tasq::cli::error::EXIT_BACKEND;
use tasq::cli::{logging, Dispatcher};
use tasq::session::LedgerFactory;
use tasq::source::{CancelToken, Context};

fn main() {
    logging::init();

    let registry = match registry() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(EXIT_BACKEND);
        }
    };

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        log::warn!("failed to install interrupt handler: {}", e);
    }

    let ctx = Context::new(cancel);
    let args: Vec<String> = std::env::args().skip(1).collect();
    let dispatcher = Dispatcher::new(&registry, Box::new(LedgerFactory));

    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();
    let code = dispatcher.run(&ctx, &args, &mut stdout, &mut stderr);
    let _ = stdout.flush();
    std::process::exit(code);
}
