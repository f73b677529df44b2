//! Demonstration of sphere sampling, triangulation and mesh generation
//!
//! Run with `RUST_LOG=sphere_mesh=debug` to see per-stage timings.

use sphere_mesh::scene::SceneSetup;
use sphere_mesh::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Generating sphere surface...");

    let config = SphereMeshConfigBuilder::new()
        .seed(42)
        .point_count(DEFAULT_POINT_COUNT)?
        .build()?;

    let surface = SphereSurface::generate(config);
    println!("Sampled {} points", surface.point_count());

    let mesh = surface.mesh();
    println!("\nMesh statistics:");
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());
    println!("  Position floats: {}", mesh.flat_positions().len());

    // Memory estimate
    let mem_positions = mesh.positions.len() * 12; // 3 floats * 4 bytes
    let mem_normals = mesh.normals.len() * 12;
    println!("\nMemory usage:");
    println!("  Positions: {} bytes", mem_positions);
    println!("  Normals: {} bytes", mem_normals);

    // Picking
    if let Some(id) = surface.find_nearest_point(DVec3::Z) {
        println!(
            "\nPoint nearest the north pole: {} ({} neighbors)",
            id,
            surface.neighbors(id).len()
        );
    }

    // Scene description for the host renderer
    let mut scene = SceneSetup::default();
    scene.camera.resize(1280, 720);
    println!("\nCamera at {:?}, aspect {:.3}", scene.camera.position, scene.camera.aspect);
    if let Some(reference) = scene.reference_sphere {
        let reference_mesh = reference.mesh()?;
        println!("Reference sphere: {} triangles", reference_mesh.triangle_count());
    }

    // Compare both triangulation modes
    println!("\n=== Triangulation modes ===");
    for mode in [TriangulationMode::Planar, TriangulationMode::ConvexHull] {
        let config = SphereMeshConfigBuilder::new()
            .seed(42)
            .point_count(2_000)?
            .triangulation(mode)
            .build()?;

        let surface = SphereSurface::generate(config);
        println!(
            "{:?}: {} points, {} triangles",
            mode,
            surface.point_count(),
            surface.triangle_count()
        );
    }

    // Degenerate input recovers to an empty mesh
    let two_points: PointSet = vec![DVec3::X, DVec3::Y].into();
    let empty = build_mesh(&two_points);
    println!("\nTwo points give {} triangles", empty.triangle_count());

    // Hand the mesh over to the renderer
    let mesh = surface.into_mesh();
    println!("Handed off mesh with {} vertices", mesh.vertex_count());

    Ok(())
}
