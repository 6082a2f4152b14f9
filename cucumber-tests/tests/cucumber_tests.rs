use cucumber::World;
use cucumber_tests::features::CongresoWorld;

#[tokio::main]
async fn main() {
    CongresoWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit(concat!(env!("CARGO_MANIFEST_DIR"), "/features"))
        .await;
}
