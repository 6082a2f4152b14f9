use cucumber::{cli, World};
use cucumber_tests::features::CongresoWorld;

#[tokio::main]
async fn main() {
    CongresoWorld::cucumber()
        .with_cli::<()>(cli::Opts::parsed())
        .run_and_exit(concat!(env!("CARGO_MANIFEST_DIR"), "/features"))
        .await;
}
