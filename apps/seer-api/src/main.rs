use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = seer_api::Args::parse();

	seer_api::run(args).await
}
