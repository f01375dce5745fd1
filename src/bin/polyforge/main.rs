//! polyforge CLI - polygon mesh editing from the command line.
//!
//! Usage: polyforge <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `polyforge --help` for available commands. Set `RUST_LOG=debug` to see
//! why a loop cut or belt search was skipped.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use nalgebra::{Point3, Vector2, Vector3};

use polyforge::algo::{
    extrude, find_connected, flip_face, loop_cut, remove_loose_edges, split_sharp_edges,
};
use polyforge::io;
use polyforge::mesh::{EdgeId, FaceId, Mesh, VertexId};
use polyforge::primitive::{
    CircleBuilder, ConeBuilder, CubeBuilder, CylinderBuilder, PlaneBuilder, SphereBuilder,
};

#[derive(Parser)]
#[command(name = "polyforge")]
#[command(author, version, about = "Polygon mesh editing CLI", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Generate a primitive shape
    Primitive {
        /// Shape to build
        #[arg(value_enum)]
        shape: Shape,

        /// Output mesh file
        output: PathBuf,

        /// Radius (circle, cone, cylinder, sphere) or half extent (cube)
        #[arg(short, long, default_value = "1.0")]
        radius: f64,

        /// Height (cone, cylinder) or edge length (plane)
        #[arg(long, default_value = "1.0")]
        height: f64,

        /// Number of segments around the axis
        #[arg(short, long, default_value = "16")]
        segments: usize,

        /// Number of latitude bands (sphere)
        #[arg(long, default_value = "8")]
        rings: usize,

        /// Axis the shape is oriented along (0 = x, 1 = y, 2 = z)
        #[arg(short, long, default_value = "0")]
        axis: usize,

        /// Material index of every face
        #[arg(short, long, default_value = "0")]
        material: usize,
    },

    /// Insert an edge loop across the belt through an edge
    LoopCut {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Index of an edge on the belt
        #[arg(short, long)]
        edge: usize,

        /// Where to cut each belt edge (0.0 to 1.0)
        #[arg(short, long, default_value = "0.5")]
        position: f64,
    },

    /// Extrude a region and move the new vertices
    Extrude {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Vertex indices to extrude (default: selected vertices)
        #[arg(short, long, value_delimiter = ',')]
        vertices: Vec<usize>,

        /// Offset applied to the extruded vertices
        #[arg(short, long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
        offset: Option<Vec<f64>>,

        /// Keep a reversed copy of the region's faces at the original position
        #[arg(long)]
        flip_face: bool,
    },

    /// Reverse the winding of faces
    Flip {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Face indices to flip (default: all faces)
        #[arg(short, long, value_delimiter = ',')]
        faces: Vec<usize>,
    },

    /// Split vertices along sharp edges
    SplitSharp {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Also mark edges sharp whose dihedral angle exceeds this (degrees)
        #[arg(short, long)]
        angle: Option<f64>,
    },

    /// Convert between mesh formats
    Convert {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Shape {
    /// Single quad
    Plane,
    /// Single n-gon
    Circle,
    /// Axis-aligned box
    Cube,
    /// Cone with an n-gon base
    Cone,
    /// Closed prism
    Cylinder,
    /// UV sphere
    Sphere,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stderr);
    builder.filter_level(if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Primitive {
            shape,
            output,
            radius,
            height,
            segments,
            rings,
            axis,
            material,
        } => {
            let params = PrimitiveParams {
                radius,
                height,
                segments,
                rings,
                axis,
                material,
            };
            cmd_primitive(shape, &output, &params)?;
        }

        Commands::LoopCut {
            input,
            output,
            edge,
            position,
        } => {
            cmd_loop_cut(&input, &output, edge, position)?;
        }

        Commands::Extrude {
            input,
            output,
            vertices,
            offset,
            flip_face,
        } => {
            cmd_extrude(&input, &output, &vertices, offset.as_deref(), flip_face)?;
        }

        Commands::Flip {
            input,
            output,
            faces,
        } => {
            cmd_flip(&input, &output, &faces)?;
        }

        Commands::SplitSharp {
            input,
            output,
            angle,
        } => {
            cmd_split_sharp(&input, &output, angle)?;
        }

        Commands::Convert { input, output } => {
            let mesh: Mesh = load(&input)?;
            save(&mesh, &output, Instant::now())?;
        }
    }

    Ok(())
}

fn load(input: &Path) -> Result<Mesh, Box<dyn std::error::Error>> {
    let mesh: Mesh = io::load(input)?;
    log::info!(
        "Loaded {}: {} vertices, {} edges, {} faces",
        input.display(),
        mesh.num_vertices(),
        mesh.num_edges(),
        mesh.num_faces()
    );
    Ok(mesh)
}

fn save(mesh: &Mesh, output: &Path, start: Instant) -> Result<(), Box<dyn std::error::Error>> {
    let elapsed = start.elapsed();
    io::save(mesh, output)?;
    log::info!(
        "Saved {}: {} vertices, {} edges, {} faces ({:.2?})",
        output.display(),
        mesh.num_vertices(),
        mesh.num_edges(),
        mesh.num_faces(),
        elapsed
    );
    Ok(())
}

fn check_index(kind: &str, index: usize, len: usize) -> Result<(), Box<dyn std::error::Error>> {
    if index < len {
        Ok(())
    } else {
        Err(format!("{} index {} out of range (mesh has {})", kind, index, len).into())
    }
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("UV points: {}", mesh.num_uv_points());
    println!("Edges: {}", mesh.num_edges());
    println!("Faces: {}", mesh.num_faces());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
    let mut materials: BTreeMap<usize, usize> = BTreeMap::new();
    for f in mesh.face_ids() {
        *sizes.entry(mesh.face(f).len()).or_default() += 1;
        *materials.entry(mesh.material(f).index()).or_default() += 1;
    }
    for (corners, count) in &sizes {
        println!("  {}-gons: {}", corners, count);
    }
    for (material, count) in &materials {
        println!("  material {}: {} faces", material, count);
    }

    let boundary = mesh
        .edge_ids()
        .filter(|&e| mesh.edge_faces(e).count() == 1)
        .count();
    let non_manifold = mesh
        .edge_ids()
        .filter(|&e| mesh.edge_faces(e).count() > 2)
        .count();
    let sharp = mesh.edge_ids().filter(|&e| mesh.is_sharp(e)).count();
    if boundary == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary edges)", boundary);
    }
    println!("Non-manifold edges: {}", non_manifold);
    println!("Sharp edges: {}", sharp);

    let mut remaining: Vec<VertexId> = mesh.vertex_ids().collect();
    let mut components = 0;
    while let Some(&seed) = remaining.first() {
        let reached = find_connected(&mesh, [seed]);
        remaining.retain(|v| !reached.contains(v));
        components += 1;
    }
    println!("Connected components: {}", components);
    println!("Valid: {}", mesh.is_valid());

    Ok(())
}

struct PrimitiveParams {
    radius: f64,
    height: f64,
    segments: usize,
    rings: usize,
    axis: usize,
    material: usize,
}

fn cmd_primitive(
    shape: Shape,
    output: &Path,
    p: &PrimitiveParams,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mesh: Mesh = match shape {
        Shape::Plane => PlaneBuilder::default()
            .with_size(Vector2::new(p.height, p.height))
            .with_normal_axis(p.axis)
            .with_material(p.material)
            .build()?,
        Shape::Circle => CircleBuilder::default()
            .with_radius(p.radius)
            .with_segment_count(p.segments)
            .with_normal_axis(p.axis)
            .with_material(p.material)
            .build()?,
        Shape::Cube => {
            let r = Vector3::repeat(p.radius);
            CubeBuilder::default()
                .with_bounds(Point3::origin() - r, Point3::origin() + r)
                .with_material(p.material)
                .build()?
        }
        Shape::Cone => ConeBuilder::default()
            .with_radius(p.radius)
            .with_height(p.height)
            .with_segment_count(p.segments)
            .with_axis(p.axis)
            .with_material(p.material)
            .build()?,
        Shape::Cylinder => CylinderBuilder::default()
            .with_radius(p.radius)
            .with_height(p.height)
            .with_segment_count(p.segments)
            .with_axis(p.axis)
            .with_material(p.material)
            .build()?,
        Shape::Sphere => SphereBuilder::default()
            .with_radius(p.radius)
            .with_segment_count(p.segments)
            .with_ring_count(p.rings)
            .with_axis(p.axis)
            .with_material(p.material)
            .build()?,
    };

    save(&mesh, output, start)
}

fn cmd_loop_cut(
    input: &Path,
    output: &Path,
    edge: usize,
    position: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = load(input)?;
    check_index("edge", edge, mesh.edge_slots())?;
    if !(0.0..=1.0).contains(&position) {
        return Err(format!("cut position {} is outside [0, 1]", position).into());
    }

    let start = Instant::now();
    let added = loop_cut(&mut mesh, EdgeId::new(edge), position);
    if added.is_empty() {
        log::warn!("edge {} does not lie on a quad belt; mesh left unchanged", edge);
    } else {
        log::info!("Inserted a loop of {} vertices", added.len());
    }

    save(&mesh, output, start)
}

fn cmd_extrude(
    input: &Path,
    output: &Path,
    vertices: &[usize],
    offset: Option<&[f64]>,
    flip: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = load(input)?;

    let region: Vec<VertexId> = if vertices.is_empty() {
        mesh.selected_vertices().collect()
    } else {
        for &v in vertices {
            check_index("vertex", v, mesh.vertex_slots())?;
        }
        vertices.iter().map(|&v| VertexId::new(v)).collect()
    };
    if region.is_empty() {
        return Err("nothing to extrude: pass --vertices or select vertices".into());
    }

    let start = Instant::now();
    let added = extrude(&mut mesh, &region, flip);
    if let Some(&[x, y, z]) = offset {
        let delta = Vector3::new(x, y, z);
        for &v in &added {
            let pos = *mesh.position(v) + delta;
            mesh.set_position(v, pos);
        }
    }
    log::info!("Extruded {} vertices", added.len());

    save(&mesh, output, start)
}

fn cmd_flip(input: &Path, output: &Path, faces: &[usize]) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = load(input)?;

    let targets: Vec<FaceId> = if faces.is_empty() {
        mesh.face_ids().collect()
    } else {
        for &f in faces {
            check_index("face", f, mesh.face_slots())?;
        }
        faces.iter().map(|&f| FaceId::new(f)).collect()
    };

    let start = Instant::now();
    for f in targets {
        flip_face(&mut mesh, f);
    }

    save(&mesh, output, start)
}

fn cmd_split_sharp(
    input: &Path,
    output: &Path,
    angle: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = load(input)?;
    let start = Instant::now();

    if let Some(degrees) = angle {
        let threshold = degrees.to_radians();
        let normals: HashMap<FaceId, Vector3<f64>> = mesh.face_normals(true).into_iter().collect();
        let creased: Vec<EdgeId> = mesh
            .edge_ids()
            .filter(|&e| {
                let faces: Vec<FaceId> = mesh.edge_faces(e).collect();
                faces.len() == 2 && normals[&faces[0]].angle(&normals[&faces[1]]) > threshold
            })
            .collect();
        log::info!("Marking {} edges sharper than {} degrees", creased.len(), degrees);
        for e in creased {
            mesh.set_sharp(e, true);
        }
    }

    let before = mesh.num_vertices();
    split_sharp_edges(&mut mesh);
    let loose = remove_loose_edges(&mut mesh);
    log::info!(
        "Split into {} additional vertices, dropped {} loose edges",
        mesh.num_vertices() - before,
        loose
    );

    save(&mesh, output, start)
}
