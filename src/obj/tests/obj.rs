use super::*;

fn obj_with(
    s: &str,
    relative_normal_base: RelativeNormalBase,
) -> (ObjData, Vec<Diagnostic>) {
    let mut diagnostics = Diagnostics::new(false);
    let data = read_obj(s.as_bytes(), None, relative_normal_base, &mut diagnostics).unwrap();
    (data, diagnostics.into_vec())
}

fn obj(s: &str) -> (ObjData, Vec<Diagnostic>) {
    obj_with(s, RelativeNormalBase::default())
}

fn kinds(diagnostics: &[Diagnostic]) -> Vec<DiagnosticKind> {
    diagnostics.iter().map(|d| d.kind().clone()).collect()
}

fn vertex_indices(geometry: &GeometryBuffer) -> Vec<i32> {
    geometry.current_object().faces().iter().map(|f| f.vertex).collect()
}

const CUBE_CORNERS: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n";

#[test]
fn single_triangle() {
    let (data, diagnostics) = obj("v 2 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let g = &data.geometry;
    assert_eq!(g.object_count(), 1);
    assert_eq!(g.current_object().name(), "default");
    assert_eq!(g.current_object().groups().len(), 1);
    assert_eq!(g.vertices(), [[-2., 0., 0.], [-1., 0., 0.], [-0., 1., 0.]]);
    assert_eq!(vertex_indices(g), [2, 1, 0]);
    assert!(!g.has_texcoords());
    assert!(!g.has_normals());
    assert_eq!(data.material_library, None);
}

#[test]
fn quad() {
    let (data, diagnostics) = obj(&format!("{CUBE_CORNERS}f 1 2 3 4\n"));
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(vertex_indices(&data.geometry), [2, 1, 3, 3, 1, 0]);
}

#[test]
fn unsupported_arity() {
    let (data, diagnostics) = obj(&format!("{CUBE_CORNERS}v 2 2 2\nf 1 2 3 4 5\nf 1 2\nf\n"));
    assert!(data.geometry.current_object().faces().is_empty());
    assert_eq!(
        kinds(&diagnostics),
        [
            DiagnosticKind::FaceArity(5),
            DiagnosticKind::FaceArity(2),
            DiagnosticKind::FaceArity(0),
        ]
    );
    assert_eq!(diagnostics[0].line(), Some(6));
}

#[test]
fn attributes() {
    let (data, diagnostics) = obj(
        "v 1 2 3\nv 4 5 6\nv 7 8 9\n\
         vt 0.5 1\nvt 0 0\n\
         vn 1 0 0\n\
         f 1/1/1 2/2/1 3//1\n\
         f 1/2 2/1 3/1\n",
    );
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let g = &data.geometry;
    assert_eq!(g.texcoords(), [[0.5, 1.], [0., 0.]]);
    // Normals are not mirrored.
    assert_eq!(g.normals(), [[1., 0., 0.]]);
    let faces = g.current_object().faces();
    assert_eq!(
        faces[..3],
        [
            FaceIndices {
                vertex: 2,
                texcoord: None,
                normal: Some(0),
            },
            FaceIndices {
                vertex: 1,
                texcoord: Some(1),
                normal: Some(0),
            },
            FaceIndices {
                vertex: 0,
                texcoord: Some(0),
                normal: Some(0),
            },
        ]
    );
    assert_eq!(faces[3], FaceIndices {
        vertex: 2,
        texcoord: Some(0),
        normal: None,
    });
    assert_eq!(g.current_object().normal_count(), 3);
}

#[test]
fn relative_indices() {
    let (data, diagnostics) = obj(&format!("{CUBE_CORNERS}f -4 -3 -2\nf -3 -2 -1\n"));
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(vertex_indices(&data.geometry), [2, 1, 0, 3, 2, 1]);
}

#[test]
fn sign_convention_is_latched_per_group() {
    // The first face decides; later positive indices are read as offsets.
    let (data, _) = obj(&format!("{CUBE_CORNERS}f -4 -3 -2\nf -1 0 -2\n"));
    assert_eq!(vertex_indices(&data.geometry)[3..], [2, 4, 3]);

    // usemtl does not reset the latch.
    let (data, _) = obj(&format!("{CUBE_CORNERS}f -4 -3 -2\nusemtl m\nf 1 2 3\n"));
    let group = &data.geometry.current_object().groups()[1];
    let v: Vec<_> = group.faces().iter().map(|f| f.vertex).collect();
    assert_eq!(v, [7, 6, 5]);

    // g and o do.
    for tag in ["g", "o x"] {
        let (data, _) = obj(&format!("{CUBE_CORNERS}f -4 -3 -2\n{tag}\nf 1 2 3\n"));
        let v = vertex_indices(&data.geometry);
        assert_eq!(v[v.len() - 3..], [2, 1, 0], "{tag}");
    }
}

#[test]
fn relative_normal_base() {
    let s = format!("{CUBE_CORNERS}vn 0 0 1\nvn 0 1 0\nf -1//-2 -2//-1 -3//-1\n");
    let (data, _) = obj(&s);
    let normals: Vec<_> = data
        .geometry
        .current_object()
        .faces()
        .iter()
        .map(|f| f.normal)
        .collect();
    assert_eq!(normals, [Some(3), Some(3), Some(2)]);

    let (data, _) = obj_with(&s, RelativeNormalBase::NormalCount);
    let normals: Vec<_> = data
        .geometry
        .current_object()
        .faces()
        .iter()
        .map(|f| f.normal)
        .collect();
    assert_eq!(normals, [Some(1), Some(1), Some(0)]);
}

#[test]
fn comments_skip_whole_line() {
    let (data, diagnostics) = obj("# header\nv 1 2 3 # trailing\nv 1 1 1\n  #\nvn#0 0 1\n");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(data.geometry.vertices(), [[-1., 1., 1.]]);
    assert!(data.geometry.normals().is_empty());
}

#[test]
fn objects_and_groups() {
    let (data, diagnostics) = obj(
        "o ignored\n\
         o cube\n\
         v 0 0 0\nv 1 0 0\nv 0 1 0\n\
         g\ng\nf 1 2 3\n\
         g top\nusemtl red\nf 1 2 3\nusemtl blue\nf 1 2 3\n\
         o empty\n",
    );
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let g = &data.geometry;
    let names: Vec<_> = g.objects().map(Object::name).collect();
    assert_eq!(names, ["cube", "empty"]);
    let cube = g.objects().next().unwrap();
    let groups: Vec<_> = cube
        .groups()
        .iter()
        .map(|g| (g.name(), g.material()))
        .collect();
    assert_eq!(
        groups,
        [
            ("Unnamed-2", None),
            ("top", Some("red")),
            ("blue", Some("blue")),
        ]
    );
    assert_eq!(cube.faces().len(), 9);
}

#[test]
fn mtllib() {
    let (data, diagnostics) = obj("mtllib  my materials.mtl \r\n");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(data.material_library.as_deref(), Some("my materials.mtl"));
}

#[test]
fn missing_arguments() {
    let (data, diagnostics) = obj("o\nmtllib\nusemtl\nv 0 0 0\n");
    assert_eq!(data.material_library, None);
    assert_eq!(data.geometry.object_count(), 1);
    assert_eq!(data.geometry.current_group().material(), None);
    assert_eq!(
        kinds(&diagnostics),
        [
            DiagnosticKind::MissingArgument("o"),
            DiagnosticKind::MissingArgument("mtllib"),
            DiagnosticKind::MissingArgument("usemtl"),
        ]
    );
    assert_eq!(diagnostics[2].line(), Some(3));
}

#[test]
fn malformed_numbers() {
    let (data, diagnostics) = obj("v 1 x 3\nvt 0.5\nv 1 1 1\nv 2 2 2\nf y 2 3\n");
    let g = &data.geometry;
    assert_eq!(g.vertices()[0], [-1., 0., 3.]);
    assert_eq!(g.texcoords(), [[0.5, 0.]]);
    // `y` reads as 0, which is a positive (absolute) index.
    assert_eq!(vertex_indices(g), [2, 1, -1]);
    assert_eq!(
        kinds(&diagnostics),
        [
            DiagnosticKind::Float("x".to_owned()),
            DiagnosticKind::Float(String::new()),
            DiagnosticKind::Int("y".to_owned()),
        ]
    );
}

#[test]
fn ignored_directives() {
    let (data, diagnostics) =
        obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nvp 1\ns off\nl 1 2\nmg 1\nF 1 2 3\nf 1 2 3\n");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(data.geometry.current_object().faces().len(), 3);
}

#[test]
fn strict() {
    let mut diagnostics = Diagnostics::new(true);
    let e = read_obj(
        b"v 0 0 0\nf 1 2 3 4 5\n",
        Some(Path::new("dir/a.obj")),
        RelativeNormalBase::default(),
        &mut diagnostics,
    )
    .unwrap_err();
    assert_eq!(e.kind(), io::ErrorKind::InvalidData);
    assert_eq!(
        e.to_string(),
        "face with 5 corners is not supported (dir/a.obj:2)"
    );

    let mut diagnostics = Diagnostics::new(true);
    let e = read_obj(b"v 0 nope 0\n", None, RelativeNormalBase::default(), &mut diagnostics)
        .unwrap_err();
    assert!(e.to_string().ends_with("(line 1)"), "{e}");
}

#[test]
fn utf16() {
    let text = "o caf\u{e9}\nv 1 2 3\n";
    let mut bytes = vec![0xFF, 0xFE];
    bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
    let mut diagnostics = Diagnostics::new(false);
    let data = read_obj(&bytes, None, RelativeNormalBase::default(), &mut diagnostics).unwrap();
    assert_eq!(data.geometry.current_object().name(), "caf\u{e9}");
    assert_eq!(data.geometry.vertices(), [[-1., 2., 3.]]);
}

#[test]
fn fuzz_lines() {
    // Arbitrary bytes never panic in lenient mode.
    let directives = ["v", "vt", "vn", "f", "o", "g", "usemtl", "mtllib", "#", "-1", "1/2/3", "//"];
    for _ in 0..200 {
        let mut s = String::new();
        for _ in 0..fastrand::usize(0..30) {
            for _ in 0..fastrand::usize(0..6) {
                s.push_str(directives[fastrand::usize(..directives.len())]);
                s.push(if fastrand::bool() { ' ' } else { '/' });
            }
            s.push('\n');
        }
        let _ = obj(&s);
    }
}

::quickcheck::quickcheck! {
    fn relative_matches_absolute(pool: u8, a: u8, b: u8, c: u8) -> bool {
        let pool = usize::from(pool) + 1;
        let [a, b, c] = [a, b, c].map(|i| usize::from(i) % pool);
        let vertices = "v 0 0 0\n".repeat(pool);
        let relative = |i: usize| -i32::try_from(pool - i).unwrap();
        let (absolute, _) = obj(&format!("{vertices}f {} {} {}\n", a + 1, b + 1, c + 1));
        let (relative, _) = obj(&format!(
            "{vertices}f {} {} {}\n",
            relative(a),
            relative(b),
            relative(c)
        ));
        absolute.geometry.current_object().faces() == relative.geometry.current_object().faces()
    }
    fn triangles_are_reversed(a: u16, b: u16, c: u16) -> bool {
        let (data, _) = obj(&format!("v 0 0 0\nf {a} {b} {c}\n"));
        let expected = [c, b, a].map(|i| i32::from(i) - 1);
        vertex_indices(&data.geometry) == expected
    }
}
