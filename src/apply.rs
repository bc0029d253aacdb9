//! Writing the composed canvas to disk and handing it to the program that
//! sets the desktop background.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    process::Command,
};

use image::{DynamicImage, ImageFormat};
use tempfile::TempPath;
use tracing::{debug, info};

use crate::{
    canvas::Canvas,
    error::{Error, Result},
};

/// The written PNG. Unless it was kept, the file is deleted on drop.
#[derive(Debug)]
pub struct OutputFile {
    path: PathBuf,
    temp: Option<TempPath>,
}

impl OutputFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }
}

/// Encodes `canvas` as PNG into a fresh, uniquely named file in `dir` (the
/// system temp directory when `None`).
pub fn write_canvas(canvas: &Canvas, dir: Option<&Path>, keep: bool) -> Result<OutputFile> {
    let dir = dir.map_or_else(std::env::temp_dir, Path::to_owned);
    let (file, temp) = tempfile::Builder::new()
        .prefix("multibg-")
        .suffix(".png")
        .tempfile_in(&dir)?
        .into_parts();

    encode_png(canvas, file)?;

    let output = if keep {
        let path = temp.keep().map_err(|err| err.error)?;
        OutputFile { path, temp: None }
    } else {
        OutputFile {
            path: temp.to_path_buf(),
            temp: Some(temp),
        }
    };
    info!(
        "Wrote {}x{} canvas to {}",
        canvas.width(),
        canvas.height(),
        output.path.display()
    );
    Ok(output)
}

/// Saves `canvas` at `path`, in the format its extension names. Formats
/// without an alpha channel get the canvas as RGB.
pub fn save_canvas(canvas: &Canvas, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
    let saved = if has_alpha(format) {
        canvas.pixels().save_with_format(path, format)
    } else {
        DynamicImage::ImageRgba8(canvas.pixels().clone())
            .into_rgb8()
            .save_with_format(path, format)
    };
    saved.map_err(Error::Encode)?;
    info!("Saved canvas to {}", path.display());
    Ok(())
}

fn has_alpha(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Jpeg | ImageFormat::Pnm)
}

fn encode_png(canvas: &Canvas, file: File) -> Result<()> {
    let mut writer = BufWriter::new(file);
    canvas
        .pixels()
        .write_to(&mut writer, ImageFormat::Png)
        .map_err(Error::Encode)?;
    writer.flush()?;
    Ok(())
}

/// Fills the image path into a set-program template.
///
/// Every `{0}` (or `{}`) becomes the path. A template without a placeholder
/// gets the path appended as its last argument. The template is scanned once,
/// so braces inside the path are left alone.
pub fn render_command(template: &str, path: &Path) -> String {
    let quoted = shell_quote(&path.to_string_lossy());
    let mut rendered = String::with_capacity(template.len() + quoted.len());
    let mut substituted = false;
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let tail = &rest[start..];
        match ["{0}", "{}"].into_iter().find(|token| tail.starts_with(*token)) {
            Some(token) => {
                rendered.push_str(&quoted);
                rest = &tail[token.len()..];
                substituted = true;
            }
            None => {
                rendered.push('{');
                rest = &tail[1..];
            }
        }
    }
    rendered.push_str(rest);

    if substituted {
        rendered
    } else {
        format!("{} {}", template.trim_end(), quoted)
    }
}

/// Runs the rendered set program through the platform shell and waits for
/// it. A non-zero exit is reported as [`Error::Command`].
pub fn run_set_program(template: &str, path: &Path) -> Result<()> {
    let command = render_command(template, path);
    info!("Running `{command}`");

    let status = shell(&command).status()?;
    debug!("`{command}` finished with {status}");
    if !status.success() {
        return Err(Error::Command {
            command,
            status: status.to_string(),
        });
    }
    Ok(())
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell_quote(value: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "/._-+,:@%=".contains(c);
    if !value.is_empty() && value.chars().all(safe) {
        value.to_owned()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

#[cfg(windows)]
fn shell_quote(value: &str) -> String {
    if value.contains([' ', '&', '(', ')', '^']) {
        format!("\"{value}\"")
    } else {
        value.to_owned()
    }
}
