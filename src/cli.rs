use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;
use crate::runtime::block_on;
use crate::tools::health::health_check;
use crate::tools::pages::{PageLoader, PageSource, RestPageSource};
use crate::tools::schema::{self, PageMeta, SchemaContext};
use crate::tools::seo_links::{self, SeoLink};
use crate::tools::sitemap;
use crate::tools::urls;
use crate::ApiResponse;

#[derive(Parser)]
#[command(name = "firmsite", version, about = "Structured data, sitemap and CMS tooling (JSON output)")]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Site config (JSON). Defaults to site.json in the platform config dir.
    #[arg(long, global = true, env = "FIRMSITE_CONFIG")]
    config: Option<PathBuf>,
    /// CMS project URL, overrides the config's api.url
    #[arg(long, global = true, env = "FIRMSITE_API_URL")]
    api_url: Option<String>,
    /// CMS anon key, overrides the config's api.anon_key
    #[arg(long, global = true, env = "FIRMSITE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// off | error | warn | info | debug | trace (ignored when RUST_LOG is set)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    #[command(subcommand)]
    Schema(SchemaCmd),
    #[command(subcommand)]
    Url(UrlCmd),
    #[command(subcommand)]
    Sitemap(SitemapCmd),
    #[command(subcommand)]
    Links(LinksCmd),
    #[command(subcommand)]
    Page(PageCmd),
    /// Check that the CMS answers
    Health,
}

#[derive(Subcommand)]
enum SchemaCmd {
    /// Parse a schema-type value (tag, JSON array string)
    Types { raw: String },
    /// Extract FAQ items from content JSON (file path or "-" for stdin)
    Faq { input: String },
    /// Parse a "City, ST ZIP" line
    Address { line: String },
    /// Build every JSON-LD node for a page's content JSON
    Page(SchemaPageArgs),
    /// List the JSON-LD nodes embedded in a rendered HTML file
    Inspect { file: PathBuf },
}

#[derive(Args)]
struct SchemaPageArgs {
    /// Content JSON (file path or "-" for stdin)
    input: String,
    /// Schema-type value; defaults to WebPage
    #[arg(long, default_value = "WebPage")]
    types: String,
    #[arg(long, default_value = "/")]
    path: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Print <script type="application/ld+json"> blocks instead of JSON
    #[arg(long)]
    html: bool,
}

#[derive(Subcommand)]
enum UrlCmd {
    /// Apply the trailing-slash rule to an href
    Slash { href: String },
}

#[derive(Subcommand)]
enum SitemapCmd {
    /// Build sitemap.xml from configured routes and published CMS pages
    Build {
        #[arg(long)]
        out: Option<PathBuf>,
        /// Skip the CMS and use configured routes only
        #[arg(long)]
        no_cms: bool,
    },
    /// Normalize every <loc> of a sitemap file in place
    Patch { file: PathBuf },
}

#[derive(Subcommand)]
enum LinksCmd {
    /// Inject the noscript link block into every .html file under DIR
    Inject {
        dir: PathBuf,
        /// Also link every internal page the built HTML already links to
        #[arg(long)]
        discover: bool,
    },
}

#[derive(Subcommand)]
enum PageCmd {
    /// Fetch one published CMS page ({} when missing)
    Fetch { path: String },
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        self.global
            .log_level
            .parse()
            .unwrap_or(log::LevelFilter::Warn)
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let global = cli.global;
    match cli.cmd {
        Command::Schema(cmd) => schema_cmd(&global, cmd),
        Command::Url(UrlCmd::Slash { href }) => {
            let host = load_config(&global).ok().and_then(|c| c.base().ok());
            let host = host.as_ref().and_then(|u| u.host_str());
            print_json(&ApiResponse::ok(urls::with_trailing_slash(&href, host)));
            Ok(())
        }
        Command::Sitemap(cmd) => sitemap_cmd(&global, cmd),
        Command::Links(LinksCmd::Inject { dir, discover }) => {
            finish(inject_links(&global, &dir, discover));
            Ok(())
        }
        Command::Page(PageCmd::Fetch { path }) => {
            finish(fetch_page(&global, &path));
            Ok(())
        }
        Command::Health => {
            finish(rest_source(&global).and_then(|source| block_on(health_check(&source))));
            Ok(())
        }
    }
}

fn inject_links(
    global: &GlobalArgs,
    dir: &Path,
    discover: bool,
) -> crate::Result<seo_links::InjectReport> {
    let config = load_config(global)?;
    let base = config.base()?;
    let mut routes: Vec<String> = config
        .routes
        .iter()
        .map(|r| urls::with_trailing_slash(r, None))
        .collect();
    if discover {
        routes.extend(seo_links::discover_routes_in_dir(dir, &base)?);
    }
    let links: Vec<SeoLink> = crate::dedupe!(routes)
        .iter()
        .map(|r| SeoLink::from_path(r))
        .collect();
    let block = seo_links::render_link_block(&base, &links)?;
    seo_links::inject_links_in_dir(dir, &block)
}

fn fetch_page(global: &GlobalArgs, path: &str) -> crate::Result<crate::tools::pages::LoadedPage> {
    let mut loader = PageLoader::new(rest_source(global)?);
    block_on(loader.load(path, &json!({})))
}

fn schema_cmd(global: &GlobalArgs, cmd: SchemaCmd) -> anyhow::Result<()> {
    match cmd {
        SchemaCmd::Types { raw } => {
            print_json(&ApiResponse::ok(schema::parse_schema_types(&Value::String(raw))));
        }
        SchemaCmd::Faq { input } => {
            let content = read_json(&input)?;
            print_json(&ApiResponse::ok(schema::extract_faq_items(&content)));
        }
        SchemaCmd::Address { line } => {
            print_json(&ApiResponse::ok(schema::parse_address_line(&line)));
        }
        SchemaCmd::Page(args) => {
            let content = read_json(&args.input)?;
            let config = match load_config(global) {
                Ok(c) => c,
                Err(e) => {
                    print_json(&ApiResponse::<()>::err(e.to_string()));
                    return Ok(());
                }
            };
            let base = config.base()?;
            let page = PageMeta {
                title: args
                    .title
                    .or_else(|| content.get("title").and_then(Value::as_str).map(String::from))
                    .unwrap_or_else(|| config.site.name.clone()),
                description: args.description,
                url: urls::absolute_url(&base, &args.path)?,
            };
            let ctx = SchemaContext {
                site: &config.site,
                page,
            };
            let nodes = schema::build_page_schemas(
                &ctx,
                &Value::String(args.types),
                &content,
                &config.schema_overrides,
            );
            if args.html {
                for node in &nodes {
                    println!("{}", schema::render_jsonld_script(node));
                }
            } else {
                print_json(&ApiResponse::ok(nodes));
            }
        }
        SchemaCmd::Inspect { file } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            print_json(&ApiResponse::ok(json!({
                "types": schema::jsonld_types(&html),
                "nodes": schema::scrape_jsonld(&html),
            })));
        }
    }
    Ok(())
}

fn sitemap_cmd(global: &GlobalArgs, cmd: SitemapCmd) -> anyhow::Result<()> {
    match cmd {
        SitemapCmd::Build { out, no_cms } => {
            let config = load_config(global)?;
            let base = config.base()?;
            let pages = if no_cms {
                Vec::new()
            } else {
                published_pages(global)
            };
            let mut entries = sitemap::entries_for(&base, &config.routes, &pages);
            let today = sitemap::today();
            for entry in entries.iter_mut() {
                entry.lastmod.get_or_insert(today);
            }
            let xml = sitemap::build_sitemap(&entries);
            match out {
                Some(path) => {
                    std::fs::write(&path, xml)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    print_json(&ApiResponse::ok(json!({
                        "written": path.display().to_string(),
                        "urls": entries.len(),
                    })));
                }
                None => print!("{xml}"),
            }
        }
        SitemapCmd::Patch { file } => {
            finish(sitemap::patch_sitemap_file(&file).map(|changed| {
                json!({ "file": file.display().to_string(), "changed": changed })
            }));
        }
    }
    Ok(())
}

/// Published CMS pages, or none when the CMS is unconfigured or unreachable.
fn published_pages(global: &GlobalArgs) -> Vec<crate::tools::pages::PageRow> {
    let source = match rest_source(global) {
        Ok(s) => s,
        Err(e) => {
            log::info!("sitemap without CMS pages: {e}");
            return Vec::new();
        }
    };
    match block_on(source.list_published()) {
        Ok(Ok(rows)) => rows,
        Ok(Err(e)) | Err(e) => {
            log::warn!("could not list CMS pages, using configured routes only: {e}");
            Vec::new()
        }
    }
}

fn load_config(global: &GlobalArgs) -> crate::Result<SiteConfig> {
    Ok(SiteConfig::load(global.config.as_deref())?
        .with_api_overrides(global.api_url.clone(), global.api_key.clone()))
}

/// REST source from the config, or from the env/flags alone when there is no config file.
fn rest_source(global: &GlobalArgs) -> crate::Result<RestPageSource> {
    if let (Some(url), Some(anon_key)) = (&global.api_url, &global.api_key) {
        return RestPageSource::new(&crate::tools::pages::ApiConfig {
            url: url.clone(),
            anon_key: anon_key.clone(),
        });
    }
    let config = load_config(global)?;
    RestPageSource::new(config.require_api()?)
}

fn read_json(input: &str) -> anyhow::Result<Value> {
    let text = read_input(input)?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {input}"))
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(Path::new(input))
            .with_context(|| format!("failed to read {input}"))
    }
}

fn finish<T: serde::Serialize>(res: crate::Result<T>) {
    match res {
        Ok(v) => print_json(&ApiResponse::ok(v)),
        Err(e) => print_json(&ApiResponse::<()>::err(e.to_string())),
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing to JSON: {}", e),
    }
}
