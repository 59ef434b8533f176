#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    lib_rewardable_activities_host::init().await
}
