mod config;
mod llm;
mod render;
mod suggest;

use anyhow::Result;
use std::env;
use std::io::Read;

use crate::suggest::mode::Mode;
use crate::suggest::Suggest;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    dotenv::dotenv().ok();

    let mode_arg = env::args().nth(1).unwrap_or_default();

    // The widget only pipes a buffer for a recognized mode; do not block on
    // stdin when the argument is already known to be bad.
    if Mode::parse(&mode_arg).is_none() {
        println!("{}", suggest::unknown_mode(&mode_arg));
        return Ok(());
    }

    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;

    let suggest = Suggest::new();
    println!("{}", suggest.run(&mode_arg, &buffer).await);

    Ok(())
}
