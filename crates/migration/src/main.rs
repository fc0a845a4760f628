use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        let url = migration::db::load_config_from_env().build_connection_string();
        // Set before the CLI reads its arguments; nothing else touches the environment.
        unsafe {
            std::env::set_var("DATABASE_URL", url);
        }
    }
    cli::run_cli(migration::Migrator).await;
}
