//! Prepare the Effortee database: validators, indexes, and optionally an
//! admin account and sample data.
//!
//! Connection settings come from the same `EFFORTEE_*` sources as the server;
//! `--mongo-uri` and `--database` override them for one run.

use std::ffi::OsString;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};

use effortee::outbound::persistence::{
    AdminAccount, ConnectionConfig, MongoStore, SetupOptions, SetupSummary, prepare_database,
};
use effortee::settings::{AppSettings, process_env};

/// Command-line arguments for `effortee-setup`.
#[derive(Debug, Parser)]
#[command(name = "effortee-setup", about = "Create Effortee collections and indexes")]
struct SetupArgs {
    /// Insert sample users and quests into empty collections.
    #[arg(long)]
    seed: bool,
    /// MongoDB connection string overriding `EFFORTEE_MONGO_URI`.
    #[arg(long)]
    mongo_uri: Option<String>,
    /// Database name overriding `EFFORTEE_DATABASE`.
    #[arg(long)]
    database: Option<String>,
    /// Create a database user with `readWrite` and `dbAdmin` roles.
    #[arg(long, requires = "admin_password")]
    create_admin: bool,
    /// Name of the database user created by `--create-admin`.
    #[arg(long, default_value = "effortee_admin")]
    admin_user: String,
    /// Password for the database user created by `--create-admin`.
    #[arg(long)]
    admin_password: Option<String>,
}

impl SetupArgs {
    fn options(&self) -> SetupOptions {
        let admin = self
            .admin_password
            .as_deref()
            .filter(|_| self.create_admin)
            .map(|password| AdminAccount::new(self.admin_user.as_str(), password));
        SetupOptions {
            seed: self.seed,
            admin,
        }
    }
}

fn connection_config(args: &SetupArgs, settings: &AppSettings) -> ConnectionConfig {
    ConnectionConfig::new(
        args.mongo_uri.as_deref().unwrap_or(settings.mongo_uri()),
        args.database.as_deref().unwrap_or(settings.database()),
    )
}

fn render_summary(database: &str, summary: &SetupSummary) -> String {
    let created = if summary.created_collections.is_empty() {
        "none".to_owned()
    } else {
        summary.created_collections.join(", ")
    };
    [
        format!("Database setup summary ({database})"),
        format!("Collections created: {created}"),
        format!("Indexes ensured: {}", summary.indexes.len()),
        format!("Admin user: {}", summary.admin),
        format!(
            "Sample data inserted: {} users, {} quests",
            summary.seeded_users, summary.seeded_quests
        ),
        format!("Users count: {}", summary.user_count),
        format!("Quests count: {}", summary.quest_count),
    ]
    .join("\n")
}

async fn run(args: SetupArgs) -> Result<()> {
    // Flags belong to this binary, so settings only read files and env.
    let settings = AppSettings::load_from_iter([OsString::from("effortee-setup")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?
        .with_legacy_env(process_env)
        .wrap_err("invalid legacy settings")?;
    let config = connection_config(&args, &settings);

    let store = MongoStore::connect(&config)
        .await
        .wrap_err("failed to configure MongoDB client")?;
    store
        .ping()
        .await
        .with_context(|| format!("MongoDB at {} is unreachable", config.uri()))?;

    let summary = prepare_database(&store, &args.options())
        .await
        .wrap_err("database setup failed")?;
    println!("{}", render_summary(config.database(), &summary));
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        eprintln!("tracing init failed: {e}");
    }
    let args = SetupArgs::parse();

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build setup runtime")?;
    runtime.block_on(run(args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use effortee::outbound::persistence::AdminOutcome;
    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "EFFORTEE_MONGO_URI",
        "EFFORTEE_DATABASE",
        "EFFORTEE_HOST",
        "EFFORTEE_PORT",
        "EFFORTEE_API_TOKEN",
    ];

    #[rstest]
    fn flags_alone_are_enough_without_any_settings() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));
        let settings = AppSettings::load_from_iter([OsString::from("effortee-setup")])
            .expect("defaults load");
        let args = SetupArgs::try_parse_from([
            "effortee-setup",
            "--mongo-uri",
            "mongodb://flags:27017",
            "--database",
            "scratch",
        ])
        .expect("valid flags");

        let config = connection_config(&args, &settings);
        assert_eq!(config.uri(), "mongodb://flags:27017");
        assert_eq!(config.database(), "scratch");
    }

    #[rstest]
    fn admin_creation_needs_a_password() {
        assert!(SetupArgs::try_parse_from(["effortee-setup", "--create-admin"]).is_err());

        let args = SetupArgs::try_parse_from([
            "effortee-setup",
            "--create-admin",
            "--admin-password",
            "pa55word",
        ])
        .expect("valid flags");
        let admin = args.options().admin.expect("admin requested");
        assert_eq!(admin.user(), "effortee_admin");
    }

    #[rstest]
    fn admin_is_skipped_unless_requested() {
        let args = SetupArgs::try_parse_from(["effortee-setup", "--admin-password", "pa55word"])
            .expect("valid flags");
        assert!(args.options().admin.is_none());
    }

    #[rstest]
    fn flags_override_settings() {
        let _guard = lock_env([
            ("EFFORTEE_MONGO_URI", Some("mongodb://env:27017".to_owned())),
            ("EFFORTEE_DATABASE", None::<String>),
        ]);
        let settings = AppSettings::load_from_iter([OsString::from("effortee-setup")])
            .expect("settings load");
        let args = SetupArgs::try_parse_from(["effortee-setup", "--seed", "--database", "scratch"])
            .expect("valid flags");

        let config = connection_config(&args, &settings);
        assert!(args.seed);
        assert_eq!(config.uri(), "mongodb://env:27017");
        assert_eq!(config.database(), "scratch");
    }

    #[rstest]
    fn summary_lists_counts() {
        let summary = SetupSummary {
            created_collections: vec!["users", "quests"],
            admin: AdminOutcome::Created,
            indexes: vec!["email_1".to_owned(), "role_1".to_owned()],
            seeded_users: 2,
            seeded_quests: 3,
            user_count: 2,
            quest_count: 3,
        };
        let rendered = render_summary("effortee", &summary);
        assert!(rendered.contains("Collections created: users, quests"));
        assert!(rendered.contains("Indexes ensured: 2"));
        assert!(rendered.contains("Admin user: created"));
        assert!(rendered.contains("Users count: 2"));
        assert!(rendered.ends_with("Quests count: 3"));
    }
}
