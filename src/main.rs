use reqforge::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli::command().get_matches();
    let output = cli::run(&matches).await?;
    if !output.is_empty() {
        println!("{}", output.trim_end());
    }
    Ok(())
}
