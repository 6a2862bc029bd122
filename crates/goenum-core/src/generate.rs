use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use heck::ToSnakeCase;
use tempfile::NamedTempFile;

use crate::config::EnumConfig;
use crate::error::GenerateError;
use crate::locate::{self, Missing};
use crate::parse;
use crate::render::{self, RenderContext, TemplateKind};
use crate::resolve::{self, Resolved};

/// A rendered output file that has not necessarily been written yet.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
    pub template: TemplateKind,
    /// Resolved values in declaration order.
    pub values: Vec<Resolved>,
}

/// `dir/color.go` + `HTTPMethod` → `dir/http_method_enum.go`.
pub fn output_path(source: &Path, type_name: &str) -> PathBuf {
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("go");
    source.with_file_name(format!("{}_enum.{ext}", type_name.to_snake_case()))
}

/// Run every step up to and including rendering, without touching the
/// output path.
pub fn plan(config: &EnumConfig) -> Result<GeneratedFile, GenerateError> {
    config.validate()?;

    let source = fs::read_to_string(&config.file).map_err(|source| GenerateError::Read {
        path: config.file.clone(),
        source,
    })?;
    let tree = parse::parse_go(&config.file, &source)?;

    let target_line = config.target_line();
    let specs = locate::locate(&tree, &source, target_line).map_err(|missing| {
        match missing {
            Missing::NoDeclaration => {
                log::debug!("no const/var declaration starts on line {target_line}")
            }
            Missing::NoValues => {
                log::debug!("declaration on line {target_line} has no single-name values")
            }
        }
        GenerateError::NoValues {
            path: config.file.clone(),
            type_name: config.type_name.clone(),
        }
    })?;
    log::debug!("found {} values for {}", specs.len(), config.type_name);

    let values = resolve::resolve(&specs, &config.type_name, config.values.as_deref());
    let representations = resolve::to_representations(&values);
    if let Some((representation, first, second)) = resolve::find_duplicate(&representations) {
        return Err(GenerateError::DuplicateRepresentation {
            path: config.file.clone(),
            representation,
            first,
            second,
        });
    }

    let template = TemplateKind::select(config.features);
    let content = render::render(
        template,
        &RenderContext {
            package: &config.package_name,
            type_name: &config.type_name,
            representations: &representations,
        },
    );

    Ok(GeneratedFile {
        path: output_path(&config.file, &config.type_name),
        content,
        template,
        values,
    })
}

/// Render the enum and write it next to the source file.
pub fn generate(config: &EnumConfig) -> Result<GeneratedFile, GenerateError> {
    let file = plan(config)?;
    write_file(&file.path, &file.content)?;
    Ok(file)
}

/// Replace `path` with `content` in one step: the text goes to a temp file in
/// the same directory, which is then renamed over the target. An identical
/// existing file is left alone.
pub fn write_file(path: &Path, content: &str) -> Result<(), GenerateError> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == content) {
        log::debug!("{} is up to date", path.display());
        return Ok(());
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let fail = |source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(fail)?;
    tmp.write_all(content.as_bytes()).map_err(fail)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(fail)?;
    }
    tmp.persist(path).map_err(|e| fail(e.error))?;
    log::info!("wrote {}", path.display());
    Ok(())
}
