use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::core::models::restraint::{AmbiguityGroup, Restraint, RestraintError, RestraintSet};

#[derive(Debug, Error)]
pub enum RestraintTableError {
    #[error("Failed to read restraint table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed restraint record: {0}")]
    Parse(#[from] csv::Error),

    #[error(transparent)]
    Restraint(#[from] RestraintError),
}

/// One row of a restraint table: a particle pair, its distance band, and an
/// optional ambiguity-group label. Rows sharing a label must be consecutive;
/// each consecutive run of equal labels becomes one ambiguity group.
#[derive(Debug, Deserialize)]
struct RestraintRecord {
    i: usize,
    j: usize,
    lower: f64,
    upper: f64,
    #[serde(default)]
    group: Option<String>,
}

/// Reads a headered CSV restraint table (`i,j,lower,upper[,group]`) and
/// builds a validated [`RestraintSet`] for a system of `particle_count`
/// particles.
pub fn read_restraint_table<R: Read>(
    reader: R,
    particle_count: usize,
) -> Result<RestraintSet, RestraintTableError> {
    let (restraints, groups) = parse_records(reader)?;
    Ok(RestraintSet::new(particle_count, restraints, groups)?)
}

/// Like [`read_restraint_table`], but sizes the system from the largest
/// restrained index. Trailing unrestrained particles cannot be inferred this
/// way; callers that know the true count should pass it explicitly.
pub fn read_restraint_table_inferring<R: Read>(
    reader: R,
) -> Result<RestraintSet, RestraintTableError> {
    let (restraints, groups) = parse_records(reader)?;
    let particle_count = restraints
        .iter()
        .map(|r| r.i.max(r.j) + 1)
        .max()
        .unwrap_or(0);
    Ok(RestraintSet::new(particle_count, restraints, groups)?)
}

fn parse_records<R: Read>(
    reader: R,
) -> Result<(Vec<Restraint>, Vec<AmbiguityGroup>), RestraintTableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut restraints = Vec::new();
    let mut groups = Vec::new();
    let mut open_run: Option<(String, usize)> = None;

    for record in csv_reader.deserialize() {
        let record: RestraintRecord = record?;
        let index = restraints.len();
        restraints.push(Restraint::new(record.i, record.j, record.lower, record.upper)?);

        let label = record.group.filter(|label| !label.is_empty());
        let continues_run =
            matches!((&open_run, &label), (Some((current, _)), Some(l)) if current == l);
        if !continues_run {
            if let Some((_, start)) = open_run.take() {
                push_group(&mut groups, start, index);
            }
            open_run = label.map(|label| (label, index));
        }
    }
    if let Some((_, start)) = open_run {
        push_group(&mut groups, start, restraints.len());
    }

    Ok((restraints, groups))
}

/// A single-row run is no different from an ungrouped restraint, so only
/// multi-member runs become explicit groups.
fn push_group(groups: &mut Vec<AmbiguityGroup>, start: usize, end: usize) {
    let len = end - start;
    if len >= 2 {
        groups.push(AmbiguityGroup { start, len });
    }
}

pub fn read_restraint_file(
    path: &Path,
    particle_count: usize,
) -> Result<RestraintSet, RestraintTableError> {
    let file = File::open(path)?;
    read_restraint_table(file, particle_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_an_ungrouped_table() {
        let table = "i,j,lower,upper\n0,1,1.0,2.0\n1,2,1.5,3.0\n";
        let set = read_restraint_table(table.as_bytes(), 3).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.groups().is_empty());
        assert_eq!(set.restraints()[1], Restraint::new(1, 2, 1.5, 3.0).unwrap());
    }

    #[test]
    fn consecutive_equal_labels_form_an_ambiguity_group() {
        let table = "i,j,lower,upper,group\n\
                     0,1,1.0,2.0,\n\
                     0,2,1.0,2.0,g1\n\
                     0,3,1.0,2.0,g1\n\
                     1,3,2.0,4.0,\n";
        let set = read_restraint_table(table.as_bytes(), 4).unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.groups(), &[AmbiguityGroup { start: 1, len: 2 }]);
    }

    #[test]
    fn a_trailing_group_is_closed() {
        let table = "i,j,lower,upper,group\n0,1,1.0,2.0,g\n0,2,1.0,2.0,g\n";
        let set = read_restraint_table(table.as_bytes(), 3).unwrap();
        assert_eq!(set.groups(), &[AmbiguityGroup { start: 0, len: 2 }]);
    }

    #[test]
    fn a_single_row_label_stays_unambiguous() {
        let table = "i,j,lower,upper,group\n0,1,1.0,2.0,solo\n1,2,1.0,2.0,\n";
        let set = read_restraint_table(table.as_bytes(), 3).unwrap();
        assert!(set.groups().is_empty());
    }

    #[test]
    fn distinct_adjacent_labels_form_separate_groups() {
        let table = "i,j,lower,upper,group\n\
                     0,1,1.0,2.0,a\n\
                     0,2,1.0,2.0,a\n\
                     1,2,1.0,2.0,b\n\
                     1,3,1.0,2.0,b\n";
        let set = read_restraint_table(table.as_bytes(), 4).unwrap();
        assert_eq!(set.groups(), &[
            AmbiguityGroup { start: 0, len: 2 },
            AmbiguityGroup { start: 2, len: 2 },
        ]);
    }

    #[test]
    fn malformed_numeric_field_is_a_parse_error() {
        let table = "i,j,lower,upper\n0,1,abc,2.0\n";
        let result = read_restraint_table(table.as_bytes(), 2);
        assert!(matches!(result, Err(RestraintTableError::Parse(_))));
    }

    #[test]
    fn invalid_restraint_row_is_rejected_with_context() {
        let table = "i,j,lower,upper\n1,1,1.0,2.0\n";
        let result = read_restraint_table(table.as_bytes(), 2);
        assert!(matches!(
            result,
            Err(RestraintTableError::Restraint(RestraintError::SelfPair {
                index: 1
            }))
        ));
    }

    #[test]
    fn out_of_range_index_is_rejected_against_the_declared_count() {
        let table = "i,j,lower,upper\n0,5,1.0,2.0\n";
        let result = read_restraint_table(table.as_bytes(), 3);
        assert!(matches!(
            result,
            Err(RestraintTableError::Restraint(
                RestraintError::ParticleOutOfRange { index: 5, .. }
            ))
        ));
    }

    #[test]
    fn inferred_count_covers_the_largest_restrained_index() {
        let table = "i,j,lower,upper\n0,1,1.0,2.0\n3,7,2.0,4.0\n";
        let set = read_restraint_table_inferring(table.as_bytes()).unwrap();
        assert_eq!(set.particle_count(), 8);
    }

    #[test]
    fn reads_from_a_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restraints.csv");
        std::fs::write(&path, "i,j,lower,upper\n0,1,1.0,2.0\n").unwrap();
        let set = read_restraint_file(&path, 2).unwrap();
        assert_eq!(set.len(), 1);
    }
}
