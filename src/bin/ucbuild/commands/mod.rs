//! Command implementations

pub mod build;
pub mod clean;
pub mod completions;
pub mod create;
pub mod info;
pub mod inspect;
pub mod package;
pub mod source;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::cli::RecipeArgs;
use ucbuild::builder::CMake;
use ucbuild::core::BuildType;
use ucbuild::ops::BuildRequest;
use ucbuild::sources::LocalCache;
use ucbuild::util::config::{load_config, Config};
use ucbuild::util::GlobalContext;
use ucbuild::Recipe;

/// Everything a pipeline command needs, with CLI > project > global
/// precedence applied.
pub struct Session {
    pub recipe: Recipe,
    pub request: BuildRequest,
    pub cache: LocalCache,
}

impl Session {
    pub fn new(args: &RecipeArgs, jobs: Option<usize>) -> Result<Self> {
        let ctx = GlobalContext::new()?;
        let config = load_config(&ctx.config_path(), &ctx.project_config_path());
        let recipe = Recipe::ucblock();

        let recipe_root = args
            .recipe
            .as_deref()
            .map(|p| ctx.resolve_path(p))
            .unwrap_or_else(|| ctx.cwd().to_path_buf());
        let workdir = workdir(&ctx, &config, args.workdir.as_ref());
        let mut request = BuildRequest::new(&recipe, recipe_root, workdir);

        config
            .apply_options(&mut request.options)
            .context("invalid option in configuration")?;
        for spec in &args.options {
            request
                .options
                .apply(spec)
                .with_context(|| format!("invalid -o argument `{}`", spec))?;
        }

        if let Some(build_type) = args.build_type.as_ref().or(config.build.build_type.as_ref()) {
            let build_type: BuildType = build_type.parse().map_err(|e| anyhow::anyhow!("{}", e))?;
            request.settings = request.settings.with_build_type(build_type);
        }

        request.generator = args.generator.clone().or(config.build.generator.clone());
        request.jobs = jobs.or(config.build.jobs);

        request.defines = config.cmake.defines.clone();
        for define in &args.defines {
            let (key, value) = parse_define(define)?;
            request.defines.insert(key, value);
        }

        let cache_dir = args
            .cache
            .as_deref()
            .or(config.cache.dir.as_deref())
            .map(|p| ctx.resolve_path(p))
            .unwrap_or_else(|| ctx.default_cache_dir());

        let cache = LocalCache::new(cache_dir);
        tracing::debug!("recipe root {}", request.recipe_root.display());
        tracing::debug!("package cache {}", cache.root().display());

        Ok(Session {
            recipe,
            request,
            cache,
        })
    }
}

/// Locate CMake and log which one is used.
pub fn cmake(verbose: bool) -> Result<CMake> {
    let cmake = CMake::find()?.verbose(verbose);
    match cmake.version() {
        Ok(version) => tracing::debug!("using cmake {}", version),
        Err(e) => tracing::debug!("could not determine cmake version: {:#}", e),
    }
    Ok(cmake)
}

/// Work directory: `--workdir`, then configuration, then `.ucbuild/work`.
pub fn workdir(ctx: &GlobalContext, config: &Config, cli: Option<&PathBuf>) -> PathBuf {
    cli.or(config.build.workdir.as_ref())
        .map(|p| ctx.resolve_path(p))
        .unwrap_or_else(|| ctx.default_workdir())
}

fn parse_define(define: &str) -> Result<(String, String)> {
    match define.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => bail!("invalid -D argument `{}`, expected KEY=VALUE", define),
    }
}
