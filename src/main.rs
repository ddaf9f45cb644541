use clap::{value_parser, Arg, Command};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use docsync::config::Config;
use docsync::listing::DirectoryLister;
use docsync::logging::{self, *};
use docsync::strategies::SyncPolicy;
use docsync::sync::SyncEngine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	let matches = Command::new("docsync")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Document browser add-on with upload-driven directory sync")
		.subcommand_required(true)
		.arg(
			Arg::new("config")
				.short('c')
				.long("config")
				.value_name("CONFIG")
				.value_parser(value_parser!(PathBuf))
				.global(true)
				.help("Config file (.toml, .json or .json5)"),
		)
		.subcommand(
			Command::new("serve")
				.about("Run the HTTP server")
				.arg(Arg::new("host").long("host").value_name("HOST").help("Address to bind"))
				.arg(
					Arg::new("port")
						.short('p')
						.long("port")
						.value_name("PORT")
						.value_parser(value_parser!(u16))
						.help("Port to bind"),
				)
				.arg(
					Arg::new("root")
						.long("root")
						.value_name("DIR")
						.value_parser(value_parser!(PathBuf))
						.help("Document root"),
				),
		)
		.subcommand(
			Command::new("sync")
				.about("Sync a local directory into the document root")
				.arg(
					Arg::new("source")
						.required(true)
						.value_name("SOURCE")
						.value_parser(value_parser!(PathBuf)),
				)
				.arg(
					Arg::new("target")
						.short('t')
						.long("target")
						.value_name("REL")
						.default_value("")
						.help("Target folder relative to the document root"),
				)
				.arg(
					Arg::new("policy")
						.long("policy")
						.value_name("POLICY")
						.value_parser(value_parser!(SyncPolicy))
						.help("replace-all or incremental"),
				),
		)
		.subcommand(
			Command::new("list")
				.about("List one folder of the document root")
				.arg(Arg::new("path").value_name("PATH").default_value("")),
		)
		.get_matches();

	let mut config = Config::load(matches.get_one::<PathBuf>("config").map(|p| p.as_path()))?;

	if let Some(sub) = matches.subcommand_matches("serve") {
		if let Some(host) = sub.get_one::<String>("host") {
			config.host = host.clone();
		}
		if let Some(port) = sub.get_one::<u16>("port") {
			config.port = *port;
		}
		if let Some(root) = sub.get_one::<PathBuf>("root") {
			config.docs_root = root.clone();
		}
		config.validate()?;
		logging::init_tracing(&config.log_level);
		docsync::server::serve(config).await?;
	} else if let Some(sub) = matches.subcommand_matches("sync") {
		config.validate()?;
		logging::init_tracing(&config.log_level);

		let source = sub.get_one::<PathBuf>("source").ok_or("sync: source argument required")?;
		let target = sub.get_one::<String>("target").map(|s| s.as_str()).unwrap_or("");
		let policy = sub.get_one::<SyncPolicy>("policy").copied().unwrap_or(config.default_policy);

		let engine = SyncEngine::new(config.docs_root.clone(), Arc::new(config.exclusion_filter()?));
		let report = engine.sync(source, target, policy)?;
		println!("{}", serde_json::to_string_pretty(&report)?);
		if report.has_errors() {
			warn!("Sync finished with {} errors", report.errors.len());
		}
	} else if let Some(sub) = matches.subcommand_matches("list") {
		config.validate()?;
		logging::init_tracing(&config.log_level);

		let path = sub.get_one::<String>("path").map(|s| s.as_str()).unwrap_or("");
		let filter = config.exclusion_filter()?;
		let listing = DirectoryLister::new(&config.docs_root, &filter).list(path)?;
		println!("{}", serde_json::to_string_pretty(&listing)?);
	}

	Ok(())
}

// vim: ts=4
