use crate::core::hash::HashValue;
use serde::Serialize;

/// A hashed item from a batch, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub source_id: String,
    pub hash: HashValue,
}

impl ImageRecord {
    pub fn new(source_id: impl Into<String>, hash: HashValue) -> Self {
        Self {
            source_id: source_id.into(),
            hash,
        }
    }
}

/// Records gathered around a seed, the first member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityGroup {
    pub members: Vec<ImageRecord>,
    pub threshold: u32,
}

impl SimilarityGroup {
    pub fn seed(&self) -> &ImageRecord {
        &self.members[0]
    }

    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.source_id.as_str())
    }
}

#[derive(Serialize)]
struct GroupMemberView<'a> {
    source: &'a str,
    hash: String,
}

impl Serialize for SimilarityGroup {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let members: Vec<GroupMemberView<'_>> = self
            .members
            .iter()
            .map(|m| GroupMemberView {
                source: &m.source_id,
                hash: m.hash.to_base64(),
            })
            .collect();

        let mut state = serializer.serialize_struct("SimilarityGroup", 3)?;
        state.serialize_field("kind", &self.seed().hash.kind())?;
        state.serialize_field("threshold", &self.threshold)?;
        state.serialize_field("members", &members)?;
        state.end()
    }
}

/// Groups records by distance to a seed in a single greedy pass.
///
/// Records are visited in input order. Each record not yet grouped becomes a
/// seed and pulls in every later ungrouped record of the same kind within
/// `threshold` of it. Membership is measured against the seed only, so two
/// non-seed members may be further apart than `threshold`. Groups with a
/// single member are dropped.
pub fn cluster(records: Vec<ImageRecord>, threshold: u32) -> Vec<SimilarityGroup> {
    let mut pending: Vec<Option<ImageRecord>> = records.into_iter().map(Some).collect();
    let mut groups = Vec::new();

    for i in 0..pending.len() {
        let Some(seed) = pending[i].take() else {
            continue;
        };
        let mut members = Vec::new();

        for slot in pending.iter_mut().skip(i + 1) {
            let Some(candidate) = slot.as_ref() else {
                continue;
            };
            if candidate.hash.kind() != seed.hash.kind() {
                continue;
            }
            match seed.hash.distance(&candidate.hash) {
                Ok(d) if d <= threshold => {
                    if let Some(record) = slot.take() {
                        members.push(record);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::debug!(
                        "Not comparing {} with {}: {}",
                        seed.source_id,
                        candidate.source_id,
                        e
                    );
                }
            }
        }

        if members.is_empty() {
            continue;
        }
        members.insert(0, seed);
        groups.push(SimilarityGroup { members, threshold });
    }

    groups
}
