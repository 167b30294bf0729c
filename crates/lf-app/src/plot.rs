//! Plotting boundary.
//!
//! The core hands a sink equal-length coordinate columns in a fixed order;
//! how they are rendered or exported is up to the sink.

use std::io::Write;

use lf_sim::Trajectory;
use serde::Serialize;

use crate::curve::Curve;
use crate::error::{AppError, AppResult};

pub trait PlotSink {
    /// 3-D line through (x[i], y[i], z[i]).
    fn line3(&mut self, title: &str, x: &[f64], y: &[f64], z: &[f64]) -> AppResult<()>;

    /// 2-D line through (x[i], y[i]).
    fn line2(&mut self, title: &str, x: &[f64], y: &[f64]) -> AppResult<()>;
}

fn check_columns(title: &str, columns: &[&[f64]]) -> AppResult<()> {
    let len = columns.first().map_or(0, |c| c.len());
    if columns.iter().any(|c| c.len() != len) {
        let lens: Vec<usize> = columns.iter().map(|c| c.len()).collect();
        return Err(AppError::InvalidInput(format!(
            "plot '{title}' has columns of unequal length {lens:?}"
        )));
    }
    Ok(())
}

pub fn plot_trajectory(
    sink: &mut dyn PlotSink,
    title: &str,
    trajectory: &Trajectory<3>,
) -> AppResult<()> {
    let (x, y, z) = trajectory.xyz();
    sink.line3(title, &x, &y, &z)
}

pub fn plot_curve(sink: &mut dyn PlotSink, title: &str, curve: &Curve) -> AppResult<()> {
    sink.line2(title, &curve.x, &curve.y)
}

/// Output format for exporting sinks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlotFormat {
    #[default]
    Csv,
    Json,
}

impl PlotFormat {
    pub fn sink<'a, W: Write + 'a>(self, out: W) -> Box<dyn PlotSink + 'a> {
        match self {
            PlotFormat::Csv => Box::new(CsvSink::new(out)),
            PlotFormat::Json => Box::new(JsonSink::new(out)),
        }
    }
}

/// Writes each line as a CSV table with a header row.
pub struct CsvSink<W: Write> {
    out: W,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PlotSink for CsvSink<W> {
    fn line3(&mut self, title: &str, x: &[f64], y: &[f64], z: &[f64]) -> AppResult<()> {
        check_columns(title, &[x, y, z])?;
        writeln!(self.out, "# {title}")?;
        writeln!(self.out, "x,y,z")?;
        for ((x, y), z) in x.iter().zip(y).zip(z) {
            writeln!(self.out, "{x},{y},{z}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn line2(&mut self, title: &str, x: &[f64], y: &[f64]) -> AppResult<()> {
        check_columns(title, &[x, y])?;
        writeln!(self.out, "# {title}")?;
        writeln!(self.out, "x,y")?;
        for (x, y) in x.iter().zip(y) {
            writeln!(self.out, "{x},{y}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    title: &'a str,
    x: &'a [f64],
    y: &'a [f64],
    #[serde(skip_serializing_if = "Option::is_none")]
    z: Option<&'a [f64]>,
}

/// Writes each line as one JSON object per output line.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &JsonLine<'_>) -> AppResult<()> {
        serde_json::to_writer(&mut self.out, line)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> PlotSink for JsonSink<W> {
    fn line3(&mut self, title: &str, x: &[f64], y: &[f64], z: &[f64]) -> AppResult<()> {
        check_columns(title, &[x, y, z])?;
        self.emit(&JsonLine {
            title,
            x,
            y,
            z: Some(z),
        })
    }

    fn line2(&mut self, title: &str, x: &[f64], y: &[f64]) -> AppResult<()> {
        check_columns(title, &[x, y])?;
        self.emit(&JsonLine {
            title,
            x,
            y,
            z: None,
        })
    }
}

/// A recorded 3-D line.
#[derive(Clone, Debug, PartialEq)]
pub struct Line3 {
    pub title: String,
    pub points: Vec<[f64; 3]>,
}

/// A recorded 2-D line.
#[derive(Clone, Debug, PartialEq)]
pub struct Line2 {
    pub title: String,
    pub points: Vec<[f64; 2]>,
}

/// Keeps lines in memory for an interactive viewer.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub lines3: Vec<Line3>,
    pub lines2: Vec<Line2>,
}

impl PlotSink for RecordingSink {
    fn line3(&mut self, title: &str, x: &[f64], y: &[f64], z: &[f64]) -> AppResult<()> {
        check_columns(title, &[x, y, z])?;
        let points = x
            .iter()
            .zip(y)
            .zip(z)
            .map(|((&x, &y), &z)| [x, y, z])
            .collect();
        self.lines3.push(Line3 {
            title: title.to_string(),
            points,
        });
        Ok(())
    }

    fn line2(&mut self, title: &str, x: &[f64], y: &[f64]) -> AppResult<()> {
        check_columns(title, &[x, y])?;
        let points = x.iter().zip(y).map(|(&x, &y)| [x, y]).collect();
        self.lines2.push(Line2 {
            title: title.to_string(),
            points,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_layout() {
        let mut sink = CsvSink::new(Vec::new());
        sink.line3("demo", &[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.5]).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "# demo\nx,y,z\n1,3,5\n2,4,6.5\n");
    }

    #[test]
    fn json_omits_z_for_2d_lines() {
        let mut sink = JsonSink::new(Vec::new());
        sink.line2("curve", &[0.0, 1.0], &[0.5, 1.5]).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["title"], "curve");
        assert_eq!(value["y"][1], 1.5);
        assert!(value.get("z").is_none());
    }

    #[test]
    fn unequal_columns_rejected() {
        let mut sink = RecordingSink::default();
        let err = sink.line3("bad", &[1.0, 2.0], &[1.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(sink.lines3.is_empty());
    }

    #[test]
    fn recording_sink_keeps_point_order() {
        let mut sink = RecordingSink::default();
        sink.line3("t", &[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]).unwrap();
        assert_eq!(sink.lines3[0].points, vec![[1.0, 3.0, 5.0], [2.0, 4.0, 6.0]]);
    }
}
