// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use fontshelf::api;
use fontshelf::app_state::AppState;
use fontshelf::bootstrap::{self, BootstrapResult};
use fontshelf::config::ValidatedConfig;
use fontshelf::runtime_paths::RuntimePaths;

const HELP_TEXT: &str = "\
Usage: fontshelf [-C <root>]

Serves font uploads, listings and font groups over HTTP.

Options:
  -C <root>    Runtime directory holding config.yaml, the catalog and uploads (default: .)
  -h, --help   Show this help
";

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

    match System::new().block_on(run_server(bootstrap)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

async fn run_server(bootstrap: BootstrapResult) -> std::io::Result<()> {
    let BootstrapResult {
        validated_config,
        runtime_paths,
        ..
    } = bootstrap;

    init_logging(&validated_config);
    log_startup_info(&validated_config, &runtime_paths);

    let config = Arc::new(validated_config);
    let workers = config.server.workers;

    let app_state = AppState::from_runtime(config.clone(), &runtime_paths).map_err(|error| {
        eprintln!("❌ Failed to open catalog: {}", error);
        std::io::Error::other(error.to_string())
    })?;

    match app_state.service.assets().sweep_stale_uploads() {
        Ok(0) => {}
        Ok(swept) => info!("Removed {} stale temporary uploads", swept),
        Err(error) => warn!("Failed to sweep stale temporary uploads: {}", error),
    }

    let app_state = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
            ))
            .configure(api::configure)
            .default_service(web::to(api::not_found))
    })
    .workers(workers)
    .bind(config.server.address_tuple())?
    .run()
    .await
}

fn init_logging(config: &ValidatedConfig) {
    let mut builder = env_logger::Builder::from_default_env();
    builder
        .filter_level(config.logging.level_filter())
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
        });

    if let Err(error) = builder.try_init() {
        eprintln!("❌ Failed to initialize logger: {}", error);
    }
}

fn log_startup_info(config: &ValidatedConfig, runtime_paths: &RuntimePaths) {
    info!("Starting FontShelf");
    info!("Workers: {}", config.server.workers);
    info!(
        "Listening on http://{}:{}",
        config.server.host, config.server.port
    );
    match config.upload.limit_bytes() {
        Some(limit) => info!("Upload limit: {} bytes", limit),
        None => info!("Upload limit: unlimited"),
    }

    info!("Runtime root: {}", runtime_paths.root.display());
    info!("Config file: {}", runtime_paths.config_file.display());
    info!(
        "Uploads directory (canonical): {}",
        runtime_paths.uploads_dir.display()
    );
    info!("Catalog file: {}", runtime_paths.catalog_file.display());

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
            return Err(format!("Unexpected argument: {}", arg));
        }
    }

    let runtime_root = make_runtime_root_absolute(runtime_root)?;

    Ok(ParsedArgs {
        runtime_root,
        mode: RunMode::Serve,
    })
}

fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help" || arg.eq_ignore_ascii_case("help")
}

fn make_runtime_root_absolute(runtime_root: PathBuf) -> Result<PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}
