//! mathlock-db: PostgreSQL demo for Math-Lock FHE
//!
//! Encrypts two values over REST, stores them in a `mathlock` table, lets the
//! extension compute the result in SQL and decrypts it over REST again.

use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mathlock::config::ConfigFile;
use mathlock::db::{run_db_demo, DbDemo, MathLockDb};
use mathlock::rest::MathLockClient;
use mathlock::MathOp;

#[derive(Parser)]
#[command(name = "mathlock-db")]
#[command(about = "Math-Lock FHE PostgreSQL demo")]
#[command(version)]
struct Args {
    /// JSON config file (optional `rest` and `db` sections)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, env = "MATHLOCK_DB_HOST")]
    db_host: Option<String>,

    #[arg(long, env = "MATHLOCK_DB_PORT")]
    db_port: Option<u16>,

    #[arg(long, env = "MATHLOCK_DB_NAME")]
    db_name: Option<String>,

    #[arg(long, env = "MATHLOCK_DB_USER")]
    db_user: Option<String>,

    #[arg(long, env = "MATHLOCK_DB_PASSWORD", hide_env_values = true)]
    db_password: Option<String>,

    /// REST API base URL without port
    #[arg(long, env = "MATHLOCK_BASE_URL")]
    base_url: Option<String>,

    /// Table to (re)create; the demo database is shared, so make it unique
    #[arg(long, default_value = "do_test_table")]
    table: String,

    #[arg(long, default_value_t = 1)]
    row_id: i32,

    /// Run all four operations instead of division only
    #[arg(long)]
    all_ops: bool,

    /// Also time this many multiplications inside the database
    #[arg(long = "loop", value_name = "N")]
    loop_count: Option<u32>,

    /// List the tables in the database before running
    #[arg(long)]
    list_tables: bool,

    /// Print the demo table's rows afterwards
    #[arg(long)]
    show_rows: bool,

    /// First operand
    #[arg(default_value = "10.5", allow_negative_numbers = true)]
    value1: String,

    /// Second operand
    #[arg(default_value = "5.34", allow_negative_numbers = true)]
    value2: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let ConfigFile { mut rest, mut db } = ConfigFile::load_or_default(args.config.as_deref())
        .with_context(|| "Failed to load config file")?;
    if let Some(base_url) = args.base_url {
        rest.base_url = base_url;
    }
    if let Some(host) = args.db_host {
        db.host = host;
    }
    if let Some(port) = args.db_port {
        db.port = port;
    }
    if let Some(name) = args.db_name {
        db.database = name;
    }
    if let Some(user) = args.db_user {
        db.user = user;
    }
    if args.db_password.is_some() {
        db.password = args.db_password;
    }
    if db.password.is_none() {
        return Err(eyre::eyre!(
            "No database password: pass --db-password, set MATHLOCK_DB_PASSWORD or add it to the config file"
        ));
    }

    info!("Math-Lock PostgreSQL demo");
    info!("Database: {}:{}/{}", db.host, db.port, db.database);

    let store = MathLockDb::connect(&db, MathLockClient::new(rest))
        .await
        .with_context(|| format!("Failed to connect to {}:{}", db.host, db.port))?;

    if args.list_tables {
        println!("Tables:");
        for name in store.table_names().await? {
            println!("  {}", name);
        }
        for table in store.tables_info().await? {
            info!(
                "{}.{} (owner: {})",
                table.schema,
                table.name,
                table.owner.as_deref().unwrap_or("-")
            );
        }
    }

    let demo = DbDemo {
        table: args.table,
        row_id: args.row_id,
        value1: args.value1,
        value2: args.value2,
        ops: if args.all_ops {
            MathOp::ALL.to_vec()
        } else {
            vec![MathOp::Division]
        },
    };

    let outcomes = run_db_demo(&store, &demo)
        .await
        .with_context(|| "Database demo failed")?;
    info!("{} operation(s) completed", outcomes.len());

    if args.show_rows {
        if let Some(rows) = store.select_all(&demo.table).await? {
            for row in rows {
                println!("{:?}", row);
            }
        }
    }

    if let Some(iterations) = args.loop_count {
        println!();
        println!("Timing {} multiplications inside PostgreSQL", iterations);
        store
            .execute_in_loop(MathOp::Multiplication, iterations, &demo.table, demo.row_id)
            .await?;
    }

    Ok(())
}
