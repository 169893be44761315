use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::core::models::system::ParticleSystem;

/// Pseudo-atom label used for every particle; genome particles carry no
/// element identity.
const PARTICLE_LABEL: &str = "P";

/// Writes a particle system in XYZ-flavored text: a count line, a comment
/// line, then one labeled coordinate line per particle in index order.
pub fn write_xyz<W: Write>(writer: W, system: &ParticleSystem, comment: &str) -> io::Result<()> {
    let mut writer = writer;
    writeln!(writer, "{}", system.len())?;
    writeln!(writer, "{comment}")?;
    for position in system.positions() {
        writeln!(
            writer,
            "{PARTICLE_LABEL} {:.6} {:.6} {:.6}",
            position.x, position.y, position.z
        )?;
    }
    writer.flush()
}

pub fn write_xyz_file(path: &Path, system: &ParticleSystem, comment: &str) -> io::Result<()> {
    let file = File::create(path)?;
    write_xyz(BufWriter::new(file), system, comment)
}
