// SCALE RESULT PLOTTING
// READS containerCount,duration ROWS WRITTEN BY THE SCALE BINARY AND
// RENDERS MINUTES AGAINST THOUSANDS OF CONTAINERS AS AN SVG.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use plotters::prelude::*;
use tracing::info;

use crate::duration::parse_minutes;
use crate::error::DriverError;

const PLOT_SIZE: (u32, u32) = (800, 425);

pub struct Series {
    pub name:   &'static str,
    pub points: Vec<(f64, f64)>,
    color:      RGBColor,
}

impl Series {
    pub fn disconnected(points: Vec<(f64, f64)>) -> Self {
        Self { name: "Disconnected", points, color: RGBColor(0x87, 0xC4, 0xA8) }
    }

    pub fn connected(points: Vec<(f64, f64)>) -> Self {
        Self { name: "Connected", points, color: RGBColor(0xE1, 0xBC, 0xBC) }
    }

    pub fn swarm(points: Vec<(f64, f64)>) -> Self {
        Self { name: "Swarm", points, color: RGBColor(0xBC, 0xC3, 0xE1) }
    }
}

pub struct PlotConfig {
    pub disconnect: Option<PathBuf>,
    pub connect:    PathBuf,
    pub swarm:      Option<PathBuf>,
    pub outfile:    PathBuf,
    pub xtick:      u32,
    pub ytick:      u32,
}

/// Parse CSV text into `(thousands of containers, minutes)` pairs.
///
/// `origin` only labels errors. Blank lines are skipped; any other
/// malformed row aborts the parse.
pub fn parse_rows(text: &str, origin: &Path) -> Result<Vec<(f64, f64)>, DriverError> {
    let row_err = |line: usize, reason: String| DriverError::CsvRow {
        path: origin.to_path_buf(),
        line,
        reason,
    };

    let mut points = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 2 {
            return Err(row_err(i + 1, format!("expected 2 columns, got {}", fields.len())));
        }
        let count: u64 = fields[0]
            .parse()
            .map_err(|_| row_err(i + 1, format!("bad container count '{}'", fields[0])))?;
        let minutes = parse_minutes(fields[1]).map_err(|e| row_err(i + 1, e.to_string()))?;
        points.push((count as f64 / 1000.0, minutes));
    }
    Ok(points)
}

pub fn read_series(path: &Path) -> Result<Vec<(f64, f64)>> {
    if !path.exists() {
        bail!("bad path: {}", path.display());
    }
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(parse_rows(&text, path)?)
}

// SMALLEST MULTIPLE OF tick AT OR ABOVE v
pub fn roundup(v: f64, tick: u32) -> u32 {
    let tick = tick.max(1);
    ((v / tick as f64).ceil().max(0.0) as u32) * tick
}

// (X MAX, Y MAX) OF THE CHART AREA
pub fn axis_extent(series: &[Series], xtick: u32, ytick: u32) -> (u32, u32) {
    let max_x = series.iter().flat_map(|s| s.points.iter().map(|p| p.0)).fold(0.0, f64::max);
    let max_y = series.iter().flat_map(|s| s.points.iter().map(|p| p.1)).fold(0.0, f64::max);
    let x = roundup(max_x, xtick).max(xtick.max(1));
    let y = roundup(max_y, ytick) + ytick.max(1);
    (x, y)
}

pub fn load(config: &PlotConfig) -> Result<Vec<Series>> {
    let mut series = Vec::new();
    if let Some(path) = &config.disconnect {
        series.push(Series::disconnected(read_series(path)?));
    }
    series.push(Series::connected(read_series(&config.connect)?));
    if let Some(path) = &config.swarm {
        series.push(Series::swarm(read_series(path)?));
    }
    Ok(series)
}

pub fn render(series: &[Series], out_file: &Path, xtick: u32, ytick: u32) -> Result<()> {
    if let Some(dir) = out_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    if out_file.exists() {
        fs::remove_file(out_file).with_context(|| format!("removing {}", out_file.display()))?;
    }

    let (max_x, max_y) = axis_extent(series, xtick, ytick);
    let xtick = xtick.max(1);
    let ytick = ytick.max(1);

    let root = SVGBackend::new(out_file, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| anyhow!("plot fill failed: {}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(0f64..max_x as f64, 0f64..max_y as f64)
        .map_err(|e| anyhow!("plot layout failed: {}", e))?;

    chart
        .configure_mesh()
        .x_labels((max_x / xtick) as usize + 1)
        .y_labels((max_y / ytick) as usize + 1)
        .x_desc("Thousands of Containers")
        .y_desc("Minutes")
        .draw()
        .map_err(|e| anyhow!("plot mesh failed: {}", e))?;

    for s in series {
        let color = s.color;
        chart
            .draw_series(
                LineSeries::new(s.points.iter().copied(), s.color.stroke_width(4)).point_size(6),
            )
            .map_err(|e| anyhow!("plot series {} failed: {}", s.name, e))?
            .label(s.name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if series.len() > 1 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(|e| anyhow!("plot legend failed: {}", e))?;
    }

    root.present().map_err(|e| anyhow!("plot write failed: {}", e))?;
    info!(path = %out_file.display(), series = series.len(), "plot written");
    Ok(())
}

pub fn run_plot(config: &PlotConfig) -> Result<()> {
    let series = load(config)?;
    render(&series, &config.outfile, config.xtick, config.ytick)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sample_rows() {
        let points = parse_rows("100,1m30s\n200,3m0s\n", Path::new("x.csv")).unwrap();
        assert_eq!(points.len(), 2);
        assert!(approx(points[0].0, 0.1) && approx(points[0].1, 1.5));
        assert!(approx(points[1].0, 0.2) && approx(points[1].1, 3.0));
    }

    #[test]
    fn blank_lines_skipped() {
        let points = parse_rows("\n1000,45s\n\n", Path::new("x.csv")).unwrap();
        assert_eq!(points.len(), 1);
        assert!(approx(points[0].0, 1.0) && approx(points[0].1, 0.75));
    }

    #[test]
    fn bad_duration_reports_line() {
        let err = parse_rows("100,1m30s\n200,3m\n", Path::new("scale.csv")).unwrap_err();
        match err {
            DriverError::CsvRow { line, path, .. } => {
                assert_eq!(line, 2);
                assert_eq!(path, PathBuf::from("scale.csv"));
            }
            other => panic!("UNEXPECTED ERROR {:?}", other),
        }
    }

    #[test]
    fn wrong_column_count_rejected() {
        assert!(parse_rows("100\n", Path::new("x.csv")).is_err());
        assert!(parse_rows("100,1s,extra\n", Path::new("x.csv")).is_err());
        assert!(parse_rows("lots,1s\n", Path::new("x.csv")).is_err());
    }

    #[test]
    fn roundup_to_tick() {
        assert_eq!(roundup(0.0, 5), 0);
        assert_eq!(roundup(3.0, 5), 5);
        assert_eq!(roundup(5.0, 5), 5);
        assert_eq!(roundup(5.1, 5), 10);
        assert_eq!(roundup(2.4, 1), 3);
    }

    #[test]
    fn extent_covers_data() {
        let series = vec![Series::connected(vec![(0.1, 1.5), (2.3, 12.0)])];
        assert_eq!(axis_extent(&series, 1, 5), (3, 20));
    }
}
