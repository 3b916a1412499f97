//! gpxgen - build GPX documents from coordinate lists.

use std::fs;
use std::io::{self, Write};
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use env_logger::{Builder, Env, Target};
use gpx_model::{
    new_element, render_to_writer, ElementInner, ElementRef, Gpx, Metadata, RenderOptions, Route,
    Track, TrackSegment, Waypoint, DEFAULT_CREATOR,
};
use log::{debug, info};

/// Build GPX 1.1 documents from coordinate lists
#[derive(Parser)]
#[command(name = "gpxgen")]
#[command(version)]
#[command(about = "Build GPX 1.1 documents from coordinate lists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write each point as a standalone waypoint
    #[command(visible_alias = "w")]
    Waypoints(PointArgs),

    /// Write the points as a single route
    #[command(visible_alias = "r")]
    Route(PointArgs),

    /// Write the points as a single track with one segment
    #[command(visible_alias = "t")]
    Track(PointArgs),
}

#[derive(Args)]
struct PointArgs {
    /// A point as LAT,LON[,ELE[,NAME]] (repeatable)
    #[arg(short = 'p', long = "point", allow_hyphen_values = true)]
    points: Vec<PointSpec>,

    /// File with one LAT,LON[,ELE[,NAME]] point per line
    #[arg(short = 'i', long)]
    input: Option<String>,

    /// Name of the route or track, or of the document for waypoints
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Creator written on the <gpx> element
    #[arg(short = 'c', long, default_value = DEFAULT_CREATOR)]
    creator: String,

    /// Indent the output, one element per line
    #[arg(long)]
    pretty: bool,

    /// Output file (default: stdout)
    output: Option<String>,
}

/// How the points of a document are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Waypoints,
    Route,
    Track,
}

/// One point read from the command line or an input file.
#[derive(Debug, Clone, PartialEq)]
struct PointSpec {
    latitude: f64,
    longitude: f64,
    elevation: Option<f64>,
    name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
struct PointParseError(String);

impl FromStr for PointSpec {
    type Err = PointParseError;

    /// Parses `LAT,LON[,ELE[,NAME]]`. The name is everything after the
    /// third comma, so it may itself contain commas.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.splitn(4, ',').map(str::trim);
        let latitude = parse_number(fields.next(), "latitude", s)?;
        let longitude = parse_number(fields.next(), "longitude", s)?;
        let elevation = match fields.next() {
            Some("") | None => None,
            Some(ele) => Some(parse_number(Some(ele), "elevation", s)?),
        };
        let name = fields
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        Ok(PointSpec {
            latitude,
            longitude,
            elevation,
            name,
        })
    }
}

fn parse_number(field: Option<&str>, what: &str, point: &str) -> Result<f64, PointParseError> {
    let field = field
        .filter(|f| !f.is_empty())
        .ok_or_else(|| PointParseError(format!("missing {} in point '{}'", what, point)))?;
    field
        .parse()
        .map_err(|_| PointParseError(format!("invalid {} '{}' in point '{}'", what, field, point)))
}

/// Parses a point list, one point per line. Blank lines and lines starting
/// with `#` are skipped.
fn parse_point_list(text: &str) -> Result<Vec<PointSpec>, PointParseError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| {
            line.parse::<PointSpec>()
                .map_err(|e| PointParseError(format!("line {}: {}", number, e)))
        })
        .collect()
}

fn main() -> std::process::ExitCode {
    Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Waypoints(args) => run_generate(Layout::Waypoints, args),
        Commands::Route(args) => run_generate(Layout::Route, args),
        Commands::Track(args) => run_generate(Layout::Track, args),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

/// Collects the points, builds the document and writes it out.
fn run_generate(layout: Layout, args: PointArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut points = args.points;
    if let Some(path) = &args.input {
        info!("Reading points from {}", path);
        let text = fs::read_to_string(path)?;
        points.extend(parse_point_list(&text)?);
    }
    if points.is_empty() {
        return Err("no points given; use --point or --input".into());
    }

    let root = build_document(layout, &points, args.name.as_deref(), &args.creator)?;

    let options = RenderOptions {
        pretty_print: args.pretty,
        ..RenderOptions::default()
    };
    write_document(&root, &options, args.output.as_deref())?;

    info!("Wrote {} points as {:?}", points.len(), layout);
    Ok(())
}

/// Renders `root` and writes it to `output_path`, or stdout.
///
/// The file is only opened once rendering has succeeded, so a failed
/// render leaves an existing file untouched.
fn write_document(
    root: &ElementRef,
    options: &RenderOptions,
    output_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rendered = Vec::new();
    render_to_writer(root, &mut rendered, options)?;
    match output_path {
        Some(path) => fs::write(path, &rendered)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&rendered)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Builds a `<gpx>` tree holding `points` in the given layout.
fn build_document(
    layout: Layout,
    points: &[PointSpec],
    name: Option<&str>,
    creator: &str,
) -> gpx_model::Result<ElementRef> {
    let root = new_element(Gpx::new(creator));

    let container = match layout {
        Layout::Waypoints => {
            if let Some(name) = name {
                let metadata = Metadata {
                    name: Some(name.to_string()),
                    ..Metadata::default()
                };
                ElementInner::append_child(&root, new_element(metadata))?;
            }
            root.clone()
        }
        Layout::Route => {
            let route = new_element(Route {
                name: name.map(str::to_string),
                ..Route::default()
            });
            ElementInner::append_child(&root, route.clone())?;
            route
        }
        Layout::Track => {
            let track = new_element(Track {
                name: name.map(str::to_string),
                ..Track::default()
            });
            let segment = new_element(TrackSegment);
            ElementInner::append_child(&root, track.clone())?;
            ElementInner::append_child(&track, segment.clone())?;
            segment
        }
    };

    for point in points {
        let waypoint = Waypoint {
            elevation: point.elevation,
            name: point.name.clone(),
            ..Waypoint::new(point.latitude, point.longitude)
        };
        ElementInner::append_child(&container, new_element(waypoint))?;
    }
    debug!(
        "Built {:?} document with {} points",
        layout,
        container.borrow().child_count()
    );

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpx_model::render_to_string;

    fn point(s: &str) -> PointSpec {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(
            point("45.0,-93.0"),
            PointSpec {
                latitude: 45.0,
                longitude: -93.0,
                elevation: None,
                name: None,
            }
        );

        let p = point(" 45.5 , -93.25 , 250 , Lake, north shore ");
        assert_eq!(p.elevation, Some(250.0));
        assert_eq!(p.name.as_deref(), Some("Lake, north shore"));

        let p = point("1,2,,Camp");
        assert_eq!(p.elevation, None);
        assert_eq!(p.name.as_deref(), Some("Camp"));
    }

    #[test]
    fn test_parse_point_errors() {
        assert!("45.0".parse::<PointSpec>().is_err());
        assert!("north,-93".parse::<PointSpec>().is_err());
        assert!("45,-93,high".parse::<PointSpec>().is_err());
        assert!("".parse::<PointSpec>().is_err());
    }

    #[test]
    fn test_parse_point_list() {
        let text = "# lake loop\n45.0,-93.0\n\n  45.1,-93.1,260\n# end\n";
        let points = parse_point_list(text).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].elevation, Some(260.0));

        let err = parse_point_list("1,1\nbad\n").unwrap_err();
        assert!(err.to_string().starts_with("line 2:"), "{}", err);
    }

    #[test]
    fn test_build_waypoints() {
        let points = vec![point("45.0,-93.0")];
        let root = build_document(Layout::Waypoints, &points, Some("Trip"), "test").unwrap();
        let out = render_to_string(&root).unwrap();
        assert!(out.contains("<metadata><name>Trip</name></metadata>"));
        assert!(out.contains(r#"<wpt lat="45.0" lon="-93.0"></wpt>"#));
    }

    #[test]
    fn test_build_route_and_track() {
        let points = vec![point("1,2,3,a"), point("4,5")];

        let root = build_document(Layout::Route, &points, Some("R"), "test").unwrap();
        let out = render_to_string(&root).unwrap();
        assert!(out.contains(
            "<rte><name>R</name><rtept lat=\"1.0\" lon=\"2.0\"><ele>3.0</ele><name>a</name></rtept>\
             <rtept lat=\"4.0\" lon=\"5.0\"></rtept></rte>"
        ));

        let root = build_document(Layout::Track, &points, None, "test").unwrap();
        let out = render_to_string(&root).unwrap();
        assert!(out.contains("<trk><trkseg><trkpt lat=\"1.0\""));
        assert_eq!(out.matches("<trkpt ").count(), 2);
    }

    #[test]
    fn test_out_of_range_point_fails_at_render() {
        let points = vec![point("95,0")];
        let root = build_document(Layout::Waypoints, &points, None, "test").unwrap();
        assert!(render_to_string(&root).unwrap_err().is_contract_violation());
    }

    #[test]
    fn test_failed_render_keeps_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.gpx");
        fs::write(&path, "previous content").unwrap();
        let path_str = path.to_str().unwrap();

        let root = build_document(Layout::Waypoints, &[point("95,0")], None, "test").unwrap();
        let err = write_document(&root, &RenderOptions::default(), Some(path_str)).unwrap_err();
        assert!(err.to_string().contains("Contract violation"), "{}", err);
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous content");

        let root = build_document(Layout::Waypoints, &[point("45,0")], None, "test").unwrap();
        write_document(&root, &RenderOptions::default(), Some(path_str)).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#"<wpt lat="45.0" lon="0.0"></wpt>"#));
        assert!(written.ends_with("</gpx>\n"));
    }

    #[test]
    fn test_cli_parses_subcommand_alias() {
        let cli = Cli::try_parse_from(["gpxgen", "t", "--point", "-45,-93", "--pretty", "out.gpx"])
            .unwrap();
        match cli.command {
            Commands::Track(args) => {
                assert_eq!(args.points, vec![point("-45,-93")]);
                assert!(args.pretty);
                assert_eq!(args.output.as_deref(), Some("out.gpx"));
                assert_eq!(args.creator, DEFAULT_CREATOR);
            }
            _ => panic!("expected the track subcommand"),
        }
    }
}
