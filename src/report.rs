//! Plain-text rendering of a finished [`Analysis`].

use std::io::{self, Write};

use crate::Analysis;

/// Optional sections of a report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Dump every input coordinate, in input order, before the cells.
    pub list_coordinates: bool,
    /// List cell members by ascending distance to the centroid, with the
    /// distance, instead of in assignment order.
    pub sorted: bool,
}

pub struct Report<'a> {
    analysis: &'a Analysis,
    options: ReportOptions,
}

impl<'a> Report<'a> {
    pub fn new(analysis: &'a Analysis, options: ReportOptions) -> Self {
        Self { analysis, options }
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let coordinates = self.analysis.coordinates();

        if self.options.list_coordinates {
            writeln!(w, "Coordinates:")?;
            for point in coordinates.points() {
                writeln!(w, "{point}")?;
            }
            writeln!(w)?;
        }

        for cell in self.analysis.grid().iter() {
            writeln!(w, "Cell {}:", cell.center())?;
            match cell.centroid() {
                Some(centroid) => writeln!(w, "Centroid: {centroid}")?,
                None => writeln!(w, "Centroid: not computed")?,
            }
            writeln!(w, "Aggregate distance: {:.16}", cell.aggregate())?;

            if self.options.sorted {
                for record in cell.sorted_distances() {
                    writeln!(w, "{} distance: {:.16}", record.position, record.distance)?;
                }
            } else {
                for &member in cell.members() {
                    writeln!(w, "{}", coordinates[member])?;
                }
            }
            writeln!(w)?;
        }

        match self.analysis.selection() {
            Some(selection) => writeln!(
                w,
                "Minimal aggregate distance: cell {} with {:.16}",
                selection.center, selection.aggregate
            ),
            None => writeln!(w, "Minimal aggregate distance: no cells"),
        }
    }

    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
