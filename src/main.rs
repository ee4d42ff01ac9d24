//! buildchecker CLI entry point.

use clap::Parser;

use buildchecker::cli::{handle_error, run, Cli};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and are not failures
            let code = i32::from(err.use_stderr());
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let json_mode = cli.json;
    if let Err(err) = run(cli).await {
        handle_error(err, json_mode);
    }
}
