use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use wolfi_package_status::{commands::status, package::RenderOptions, query::QuerySet};

/// wolfi-package-status - report the versions of wolfi packages
///
/// Looks up packages in the wolfi, enterprise-packages and extra-packages
/// APK repositories and prints their versions, build times and sub packages.
///
/// The non public repositories need a token, from --auth-token, the
/// HTTP_AUTH environment variable or an interactive prompt. Get one with
/// `chainctl auth token --audience apk.cgr.dev`.
///
/// Examples:
///   wolfi-package-status python-3.13 --show-sub-packages
///   wolfi-package-status --regex 'python-3\.1[23].*' --all-versions
///   wolfi-package-status --local-apkindex ./APKINDEX.tar.gz
#[derive(Parser, Debug)]
#[command(
    author,
    version = env!("PKGSTATUS_VERSION"),
    about,
    arg_required_else_help = true
)]
struct Cli {
    /// Package names to look up (patterns with --regex)
    #[arg(value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Treat every PACKAGE as a regular expression
    #[arg(long)]
    pub regex: bool,

    /// Show all versions instead of only the latest one
    #[arg(long = "all-versions")]
    pub all_versions: bool,

    /// Read a local APKINDEX.tar.gz instead of the remote repositories
    #[arg(long = "local-apkindex", visible_alias = "local-index", value_name = "PATH")]
    pub local_apkindex: Option<PathBuf>,

    /// Token for the non public repositories (enterprise-packages and extra-packages)
    #[arg(
        long = "auth-token",
        env = "HTTP_AUTH",
        value_name = "TOKEN",
        hide_env_values = true
    )]
    pub auth_token: Option<String>,

    /// Show the parent/origin package of every version
    #[arg(long = "show-parent-package")]
    pub show_parent_package: bool,

    /// Show the sub packages built from each package
    #[arg(long = "show-sub-packages")]
    pub show_sub_packages: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            list_all_versions: self.all_versions,
            json: self.json,
            show_parent_package: self.show_parent_package,
            show_sub_packages: self.show_sub_packages,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = wolfi_package_status::runtime::RealRuntime;

    let queries = QuerySet::from_args(&cli.packages, cli.regex)?;
    let options = cli.render_options();

    let summary = status(runtime, queries, options, cli.local_apkindex, cli.auth_token).await?;
    if summary.all_failed() {
        std::process::exit(1);
    }
    Ok(())
}
