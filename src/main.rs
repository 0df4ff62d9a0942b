mod cli;
mod commands;
mod headless;

use std::sync::Arc;

use queasy_store::Store;

fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_colors(true)
        .with_threads(true)
        .with_local_timestamps()
        .init()
        .expect("failed to build logger instance");

    let args = cli::parse_args();
    let store = Arc::new(match &args.store_dir {
        Some(dir) => Store::open_at(dir)?,
        None => Store::open_default()?,
    });

    match args.command {
        cli::Command::Serve => commands::serve(store),
        command => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("failed to build tokio runtime");
            runtime.block_on(commands::dispatch(store, command))
        }
    }
}
