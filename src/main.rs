use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;

use collection_transform::scene_graph::Scene;
use collection_transform::tool::{
    ApplyOutcome, History, PivotMode, SessionContext, StaticHost, ToolConfig, TransformDelta,
    SCALE_FLOOR,
};

/// Apply a world-space transform to every object of a collection in a glTF
/// file. Every glTF scene is loaded as one collection.
#[derive(Debug, Parser)]
#[command(name = "collection-transform", version)]
struct Cli {
    /// glTF file to load
    file: PathBuf,

    /// Collection (glTF scene name) to transform; defaults to the first one
    #[arg(long)]
    collection: Option<String>,

    /// World-space translation, "x,y,z"
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0", allow_hyphen_values = true)]
    translate: Vec3,

    /// World-space XYZ Euler rotation in degrees, "x,y,z"
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0", allow_hyphen_values = true)]
    rotate: Vec3,

    /// Per-axis scale, "x,y,z"
    #[arg(long, value_parser = parse_vec3, default_value = "1,1,1")]
    scale: Vec3,

    /// median, bounding-box, cursor, individual or active
    #[arg(long, default_value = "median")]
    pivot: PivotMode,

    /// 3D cursor location for the cursor pivot, "x,y,z"
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    cursor: Option<Vec3>,

    /// Name of the active object for the active pivot
    #[arg(long)]
    active: Option<String>,

    /// Bake each object's local rotation into its mesh afterwards
    #[arg(long)]
    bake: bool,

    /// Sweep a live preview up to the full transform before committing
    #[arg(long)]
    preview: bool,
}

fn parse_vec3(value: &str) -> Result<Vec3, String> {
    let components = value
        .split(',')
        .map(|component| component.trim().parse::<f32>())
        .collect::<Result<Vec<f32>, _>>()
        .map_err(|error| format!("invalid vector {value:?}: {error}"))?;

    match components.as_slice() {
        &[x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("expected three comma separated values, got {value:?}")),
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let mut scene = Scene::new();
    let collections = scene.import_gltf(&cli.file)?;

    let collection = match &cli.collection {
        Some(name) => Some(
            scene
                .get_collection_by_name(name)
                .with_context(|| format!("No collection named {name}"))?,
        ),
        None => collections.first().copied(),
    };

    let active = match &cli.active {
        Some(name) => {
            let id = scene
                .get_object_by_name(name)
                .with_context(|| format!("No object named {name}"))?;
            scene.world_origin(id)
        }
        None => None,
    };

    let host = StaticHost {
        collection,
        pivot_mode: Some(cli.pivot),
        cursor: cli.cursor,
        active,
    };

    let delta = TransformDelta::from_degrees(cli.translate, cli.rotate, cli.scale);
    delta.validate(SCALE_FLOOR)?;

    let mut session = SessionContext::new(ToolConfig::default());
    session.set_bake_rotation(cli.bake);
    let mut history = History::new();

    let outcome = if cli.preview {
        session.set_preview_enabled(true, &mut scene);

        for fraction in [0.25, 0.5, 1.0] {
            session.set_delta(TransformDelta {
                translation: delta.translation * fraction,
                rotation: delta.rotation * fraction,
                scale: Vec3::ONE.lerp(delta.scale, fraction),
            });
            if let ApplyOutcome::Previewed(report) = session.preview_step(&mut scene, &host)? {
                log::info!("{} at {:.0}%: {}", session.status_text(), fraction * 100.0, report);
            }
        }

        session.commit(&mut scene, &mut history)?
    } else {
        session.set_delta(delta);
        session.apply(&mut scene, &host, &mut history)?
    };

    match outcome {
        ApplyOutcome::Applied(report) => println!("{report}"),
        ApplyOutcome::EmptyCollection { collection } => {
            println!("Collection '{collection}' contains no objects")
        }
        ApplyOutcome::NothingToApply | ApplyOutcome::Previewed(_) => {
            println!("Nothing to apply (all values at default)")
        }
    }

    if let Some(collection) = collection {
        let mut members: Vec<_> = scene.collection_members(collection).into_iter().collect();
        members.sort();

        for id in members {
            if let (Some(object), Some(origin)) = (scene.get_object(id), scene.world_origin(id)) {
                println!(
                    "  {:<24} {:>10.4} {:>10.4} {:>10.4}",
                    object.name, origin.x, origin.y, origin.z
                );
            }
        }
    }

    Ok(())
}
