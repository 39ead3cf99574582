use anyhow::Result;
use clap::Parser;
use deep_research_rs::cli::Args;
use deep_research_rs::{GeneratorContext, RunOptions, launch, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 不存在时忽略
    dotenvy::dotenv().ok();

    let args = Args::parse();
    logging::init(args.verbose);

    let config = args.into_config()?;
    let query = args.to_query(&config)?;
    let options = RunOptions {
        excluded_sources: args.excluded_sources(),
        output: args.output.clone(),
    };

    let context = GeneratorContext::new(config)?;
    launch(&context, query, &options).await?;

    Ok(())
}
