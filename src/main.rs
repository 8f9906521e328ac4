#[tokio::main]
async fn main() -> anyhow::Result<()> {
    agent_plans::server::run().await
}
