//! Virtual mosaics of raster tiles.
//!
//! [`build_mosaic`] hands every tile of a directory to the engine's
//! "Create Virtual Raster (VRT)" tool, which writes a VRT file describing
//! the tiles as one raster.

use std::path::{Path, PathBuf};

use crate::context::Context;
use crate::data::DataManager;
use crate::errors::*;
use crate::tool::ToolInstance;
use crate::ui::UiLock;

const VRT_TOOL_NAME: &str = "Create Virtual Raster (VRT)";

/// Build or update the virtual raster `{folder}/{name}.vrt` from all files
/// in `directory` with the given `extension`.
///
/// `folder` defaults to `directory`. Returns the path of the VRT file as
/// reported by the tool.
///
/// # Errors
///
/// Fails if no tile is found, the VRT tool is not available or its
/// execution fails. The error is also reported through the messenger.
pub fn build_mosaic<P: AsRef<Path>>(
    ctx: &Context,
    directory: P,
    extension: &str,
    name: &str,
    folder: Option<&Path>,
) -> Result<PathBuf> {
    let directory = directory.as_ref();
    let tiles = find_tiles(directory, extension).map_err(|e| ctx.report(e))?;
    if tiles.is_empty() {
        return Err(ctx.report(HelperError::NoFilesFound {
            directory: directory.to_path_buf(),
            extension: extension.to_string(),
        }));
    }
    log::debug!("building mosaic from {} tile(s)", tiles.len());

    let config = ctx.config();
    let Some(mut tool) = ToolInstance::create(ctx.tools(), &config.vrt_library, &config.vrt_tool)
    else {
        ctx.messenger()
            .error(&format!("Failed to request tool: {VRT_TOOL_NAME}"));
        return Err(HelperError::ToolNotFound {
            library: config.vrt_library.clone(),
            tool: config.vrt_tool.clone(),
        });
    };

    let vrt_name = folder.unwrap_or(directory).join(format!("{name}.vrt"));
    tool.reset();
    let parameters = tool.parameters_mut();
    parameters
        .set_value("FILES", file_list(&tiles).into())
        .map_err(|e| ctx.report(e))?;
    parameters
        .set_value("VRT_NAME", vrt_name.display().to_string().into())
        .map_err(|e| ctx.report(e))?;

    let success = {
        let _lock = UiLock::new(ctx.messenger());
        let mut data = DataManager::new();
        tool.execute(&mut data)
    };
    if !success {
        return Err(ctx.report(HelperError::ExecutionFailed(tool.name().to_string())));
    }

    tool.parameters()
        .get("VRT_NAME")
        .and_then(|p| p.as_string())
        .map(PathBuf::from)
        .ok_or_else(|| ctx.report(HelperError::ParameterNotFound("VRT_NAME".to_string())))
}

fn find_tiles(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&directory.to_string_lossy()),
        extension
    );
    let mut tiles = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() => tiles.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("skipping tile: {e}"),
        }
    }
    tiles.sort();
    Ok(tiles)
}

/// Quote and join `files` into the single argument string the VRT tool takes.
pub fn file_list<P: AsRef<Path>>(files: &[P]) -> String {
    files
        .iter()
        .map(|file| format!("\"{}\" ", file.as_ref().display()))
        .collect()
}

/// Split an argument string built by [`file_list`] back into paths.
/// Unquoted entries are separated by whitespace.
pub fn parse_file_list(files: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut rest = files.trim_start();
    while !rest.is_empty() {
        let (path, tail) = match rest.strip_prefix('"') {
            Some(quoted) => match quoted.find('"') {
                Some(end) => (&quoted[..end], &quoted[end + 1..]),
                None => (quoted, ""),
            },
            None => match rest.find(char::is_whitespace) {
                Some(end) => (&rest[..end], &rest[end..]),
                None => (rest, ""),
            },
        };
        if !path.is_empty() {
            paths.push(PathBuf::from(path));
        }
        rest = tail.trim_start();
    }
    paths
}
