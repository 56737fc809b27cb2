use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = aurora_api::Args::parse();

	aurora_api::run(args).await
}
