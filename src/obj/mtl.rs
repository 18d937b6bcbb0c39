use std::{io, path::Path, str::SplitWhitespace};

use super::{DiagnosticKind, Diagnostics};
use crate::{
    utils::{bytes::Lines, float, utf16::decode_text},
    Color3, Material, Materials, ShadingModel, Texture,
};

/// Reads an MTL file into a material table.
///
/// Texture paths are stored as written; resolving and reading them is up to
/// the caller. `path` is only used for diagnostics.
pub fn read_mtl(
    bytes: &[u8],
    path: Option<&Path>,
    diagnostics: &mut Diagnostics,
) -> io::Result<Materials> {
    let text = decode_text(bytes)?;
    diagnostics.set_file(path);
    let mut parser = MtlParser {
        materials: Materials::default(),
        // Directives before the first newmtl go to a material that is dropped.
        current: Material::new(""),
        keep_current: false,
        diagnostics,
    };
    for (line_number, line) in Lines::new(&text) {
        parser.diagnostics.set_line(Some(line_number));
        parser.read_line(line)?;
    }
    parser.diagnostics.set_line(None);
    parser.flush();
    Ok(parser.materials)
}

struct MtlParser<'a> {
    materials: Materials,
    current: Material,
    keep_current: bool,
    diagnostics: &'a mut Diagnostics,
}

impl MtlParser<'_> {
    fn read_line(&mut self, line: &str) -> io::Result<()> {
        let mut line = line.trim();
        if let Some(i) = memchr::memchr(b'#', line.as_bytes()) {
            line = &line[..i];
        }
        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next() else {
            return Ok(());
        };
        if tag == "newmtl" {
            return match tokens.next() {
                Some(name) => self.new_material(name),
                None => self
                    .diagnostics
                    .report(DiagnosticKind::MissingArgument("newmtl")),
            };
        }

        let material = &mut self.current;
        let diagnostics = &mut *self.diagnostics;
        match tag {
            "Ka" => material.ambient = read_color(&mut tokens, diagnostics)?,
            "Kd" => material.diffuse = read_color(&mut tokens, diagnostics)?,
            "Ks" => material.specular = read_color(&mut tokens, diagnostics)?,
            "Ns" => material.shininess = diagnostics.float(tokens.next())? / 1000.,
            "d" | "Tr" => material.alpha = diagnostics.float(tokens.next())?,
            "illum" => material.illumination_model = diagnostics.int(tokens.next())?,
            "map_Kd" => {
                if let Some(path) = last_token(tokens, "map_Kd", diagnostics)? {
                    material.diffuse_texture = Some(Texture::new(path));
                }
            }
            "map_Ka" => {
                material.ambient_texture =
                    last_token(tokens, "map_Ka", diagnostics)?.map(str::to_owned);
            }
            "map_Ks" => {
                material.specular_texture =
                    last_token(tokens, "map_Ks", diagnostics)?.map(str::to_owned);
            }
            "map_Ke" => {
                material.emissive_texture =
                    last_token(tokens, "map_Ke", diagnostics)?.map(str::to_owned);
            }
            "map_bump" | "bump" => {
                let args: Vec<_> = tokens.collect();
                read_bump(material, &args, diagnostics)?;
            }
            _ => diagnostics.report(DiagnosticKind::UnknownDirective(line.to_owned()))?,
        }
        Ok(())
    }

    fn new_material(&mut self, name: &str) -> io::Result<()> {
        self.flush();
        let duplicate = self.materials.index_of(name).is_some();
        self.current = Material::new(name);
        self.keep_current = !duplicate;
        if duplicate {
            self.diagnostics
                .report(DiagnosticKind::DuplicateMaterial(name.to_owned()))?;
        }
        Ok(())
    }

    fn flush(&mut self) {
        if !self.keep_current {
            return;
        }
        self.keep_current = false;
        let mut material = std::mem::replace(&mut self.current, Material::new(""));
        material.shading_model = ShadingModel::from_mtl(
            material.illumination_model,
            material.bump_texture.is_some(),
        );
        self.materials.insert(material);
    }
}

fn read_color(
    tokens: &mut SplitWhitespace<'_>,
    diagnostics: &mut Diagnostics,
) -> io::Result<Color3> {
    Ok([
        diagnostics.float(tokens.next())?,
        diagnostics.float(tokens.next())?,
        diagnostics.float(tokens.next())?,
    ])
}

// Texture directives may carry options; the path is the last token.
fn last_token<'a>(
    tokens: SplitWhitespace<'a>,
    tag: &'static str,
    diagnostics: &mut Diagnostics,
) -> io::Result<Option<&'a str>> {
    let last = tokens.last();
    if last.is_none() {
        diagnostics.report(DiagnosticKind::MissingArgument(tag))?;
    }
    Ok(last)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    String,
    Number,
}

struct BumpOption {
    name: &'static str,
    kind: ValueKind,
    min: usize,
    max: usize,
}

const fn option(name: &'static str, kind: ValueKind, min: usize, max: usize) -> BumpOption {
    BumpOption {
        name,
        kind,
        min,
        max,
    }
}

static BUMP_OPTIONS: &[BumpOption] = &[
    option("bm", ValueKind::String, 1, 1),
    option("clamp", ValueKind::String, 1, 1),
    option("blendu", ValueKind::String, 1, 1),
    option("blendv", ValueKind::String, 1, 1),
    option("imfchan", ValueKind::String, 1, 1),
    option("mm", ValueKind::String, 1, 1),
    option("o", ValueKind::Number, 1, 3),
    option("s", ValueKind::Number, 1, 3),
    option("t", ValueKind::Number, 1, 3),
    option("texres", ValueKind::String, 1, 1),
];

impl BumpOption {
    fn accepts(&self, token: &str) -> bool {
        self.kind == ValueKind::String || float::is_signed_decimal(token)
    }
}

/// Reads the arguments of `bump`/`map_bump`: `[-option values...]... filename`.
///
/// Option values are only logged. A token that does not start with `-` and
/// is not consumed as an option value is a filename candidate; the last one
/// wins.
fn read_bump(
    material: &mut Material,
    args: &[&str],
    diagnostics: &mut Diagnostics,
) -> io::Result<()> {
    let mut filename = None;
    let mut pos = 0;
    while pos < args.len() {
        let token = args[pos];
        pos += 1;
        let Some(name) = token.strip_prefix('-') else {
            filename = Some(token);
            continue;
        };
        // Unknown options are skipped without their values.
        let Some(option) = BUMP_OPTIONS.iter().find(|o| o.name == name) else {
            continue;
        };

        let start = pos;
        while pos - start < option.min && pos < args.len() && option.accepts(args[pos]) {
            pos += 1;
        }
        if pos - start < option.min {
            // Values read so far stay consumed.
            diagnostics.report(DiagnosticKind::BumpOption {
                option: name.to_owned(),
                material: material.name.clone(),
            })?;
            continue;
        }
        while pos - start < option.max && pos < args.len() && option.accepts(args[pos]) {
            pos += 1;
        }
        log::debug!(
            target: "obj_import",
            "found bump option -{name} of material {:?}: {:?}",
            material.name,
            &args[start..pos]
        );
    }
    if let Some(filename) = filename {
        material.bump_texture = Some(Texture::new(filename));
    }
    Ok(())
}
