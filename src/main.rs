use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use geo::{coord, LineString};
use streetnav::{
    Algorithm, AllPaths, Grid, MapMatcher, Path, PathFinder, Point, StreetNetwork, StreetSegment,
};

#[derive(Parser)]
struct Cli {
    /// Number of rows of the generated lattice network
    rows: usize,

    /// Number of columns of the generated lattice network
    cols: usize,

    /// Intersection where the route starts (row * cols + col)
    origin: usize,

    /// Intersection where the route ends (row * cols + col)
    destination: usize,

    /// Search algorithm: list, heap, heap:<d>, buckets, correcting or correcting:<oldest|newest>
    #[arg(short, long, default_value_t = Algorithm::default())]
    algorithm: Algorithm,

    /// X coordinate of a position sample to match onto the network
    #[arg(short, long, requires = "y")]
    x: Option<f64>,

    /// Y coordinate of a position sample to match onto the network
    #[arg(short, long, requires = "x")]
    y: Option<f64>,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let network = build_lattice(cli.rows, cli.cols);
    let mut finder = PathFinder::new(cli.algorithm);
    let mut all_paths = AllPaths::default();
    let route = finder.find_path(cli.origin, cli.destination, &network, &mut all_paths)?;

    let matched = match (cli.x, cli.y) {
        (Some(x), Some(y)) => {
            let grid = Grid::from_network(&network)?;
            MapMatcher::new(Arc::new(grid)).match_position(coord! { x: x, y: y })
        }
        _ => None,
    };

    println!("{{");
    println!("  \"type\": \"FeatureCollection\",");
    println!("  \"features\": [");
    println!("    {{");
    println!("      \"type\": \"Feature\",");
    println!("      \"properties\": {{\"algorithm\": \"{}\"}},", cli.algorithm);

    println!("      \"geometry\": {{");
    println!("        \"type\": \"LineString\",");
    println!("        \"coordinates\": [");

    let mut points = route_points(&route).into_iter().peekable();
    while let Some(p) = points.next() {
        let suffix = if points.peek().is_some() { "," } else { "" };
        println!("          [{}, {}]{}", p.x, p.y, suffix);
    }

    println!("        ]");
    println!("      }}");

    if let Some(m) = matched {
        println!("    }},");
        println!("    {{");
        println!("      \"type\": \"Feature\",");
        println!(
            "      \"properties\": {{\"segment\": \"{}\", \"distance\": {}}},",
            m.segment.id(),
            m.distance
        );
        println!("      \"geometry\": {{");
        println!("        \"type\": \"Point\",");
        println!("        \"coordinates\": [{}, {}]", m.point.x, m.point.y);
        println!("      }}");
    }

    println!("    }}");
    println!("  ]");
    println!("}}");

    Ok(())
}

/// Builds a `rows × cols` lattice with unit-length segments in both directions
/// between horizontally and vertically adjacent intersections.
fn build_lattice(rows: usize, cols: usize) -> StreetNetwork {
    let mut segments = Vec::with_capacity(4 * rows * cols);
    let mut connect = |from: (usize, usize), to: (usize, usize)| {
        for ((r1, c1), (r2, c2)) in [(from, to), (to, from)] {
            let shape = LineString::from(vec![(c1 as f64, r1 as f64), (c2 as f64, r2 as f64)]);
            segments.push(Arc::new(StreetSegment::new(
                format!("{}.{}-{}.{}", r1, c1, r2, c2),
                r1 * cols + c1,
                r2 * cols + c2,
                1.0,
                Arc::new(shape),
            )));
        }
    };

    for row in 0..rows {
        for col in 0..cols {
            if col + 1 < cols {
                connect((row, col), (row, col + 1));
            }
            if row + 1 < rows {
                connect((row, col), (row + 1, col));
            }
        }
    }

    StreetNetwork::from_segments(segments)
}

/// Lists the points of a route from its origin to its destination.
fn route_points(route: &Path) -> Vec<Point> {
    let mut points: Vec<Point> = Vec::default();
    for segment in route.values() {
        // Routes run against the direction of their segments
        let mut shape = segment.shape().0.iter().rev().copied();
        if !points.is_empty() {
            shape.next();
        }
        points.extend(shape);
    }
    points
}
