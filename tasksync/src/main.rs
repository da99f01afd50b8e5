// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::info;
use std::io::Write;
use std::path::PathBuf;

use tasksync::api;
use tasksync::app_state::AppState;
use tasksync::authz::RoleRegistry;
use tasksync::bootstrap::{self, BootstrapResult};
use tasksync::config::ValidatedConfig;
use tasksync::store::SqliteStore;

const HELP_TEXT: &str = "Usage: tasksync [-C <root>]\n\n  -C <root>   runtime directory holding config.yaml (default: .)\n  -h, --help  show this help\n";

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if matches!(parsed_args.mode, RunMode::Help) {
        print!("{}", HELP_TEXT);
        return 0;
    }

    let bootstrap = match bootstrap::bootstrap_runtime(&parsed_args.runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Bootstrap error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    if let Err(error) = init_logger(&bootstrap.validated_config) {
        eprintln!("❌ Failed to initialize logger: {}", error);
        return 1;
    }

    match System::new().block_on(run_server(bootstrap)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

fn init_logger(config: &ValidatedConfig) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(config.logging.level_filter())
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
}

async fn run_server(bootstrap: BootstrapResult) -> std::io::Result<()> {
    let validated_config = bootstrap.validated_config;
    log_startup_info(&validated_config, &bootstrap.runtime_root);

    let store = match SqliteStore::connect(&validated_config.database).await {
        Ok(store) => store,
        Err(error) => {
            eprintln!("❌ Failed to open database: {}", error);
            eprintln!("❌ Application cannot start without storage.");
            return Err(std::io::Error::other(error.to_string()));
        }
    };
    info!("✅ Database ready, migrations applied");

    if let Err(error) = RoleRegistry::new(store.clone()).seed().await {
        eprintln!("❌ Failed to seed roles and permissions: {}", error);
        return Err(std::io::Error::other(error.to_string()));
    }
    info!("✅ Role and permission catalog seeded");

    let host = validated_config.server.host.clone();
    let port = validated_config.server.port;
    let workers = validated_config.server.workers;

    let app_state = match AppState::new(validated_config, store.clone()) {
        Ok(state) => state,
        Err(error) => {
            eprintln!("❌ Failed to initialize services: {}", error);
            return Err(std::io::Error::other(error.to_string()));
        }
    };
    info!(
        "✅ App state initialized with app name: {}",
        app_state.config.app.name
    );

    let server = HttpServer::new(move || {
        let state = app_state.clone();
        App::new()
            .wrap(Logger::default())
            .configure(move |cfg| api::configure(cfg, &state))
            .default_service(web::to(api::envelope::not_found))
    })
    .workers(workers)
    .bind((host.as_str(), port))?;

    info!("🚀 Listening on http://{}:{}{}", host, port, api::API_PREFIX);
    let result = server.run().await;

    store.close().await;
    result
}

fn log_startup_info(config: &ValidatedConfig, runtime_root: &std::path::Path) {
    info!("Starting {}", config.app.name);
    info!("Runtime root: {}", runtime_root.display());
    info!("Database: {}", config.database.url);
    info!("Workers: {}", config.server.workers);
    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {}", current_dir.display());
    }
}

enum RunMode {
    Serve,
    Help,
}

struct ParsedArgs {
    runtime_root: PathBuf,
    mode: RunMode,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|arg| is_help_flag(arg)) {
        return Ok(ParsedArgs {
            runtime_root: PathBuf::from("."),
            mode: RunMode::Help,
        });
    }

    let mut args = args.into_iter();
    let mut runtime_root = PathBuf::from(".");

    while let Some(arg) = args.next() {
        if arg == "--" {
            continue;
        } else if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            runtime_root = PathBuf::from(value);
        } else {
            return Err(format!("Unexpected argument '{}'", arg));
        }
    }

    let runtime_root = make_runtime_root_absolute(runtime_root)?;
    Ok(ParsedArgs {
        runtime_root,
        mode: RunMode::Serve,
    })
}

fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help"
}

fn make_runtime_root_absolute(runtime_root: PathBuf) -> Result<PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}
