use indexmap::IndexMap;
use super::explorer::StationPaths;
use super::path::StationPath;

/// Complete paths sharing one origin and one destination connector
#[derive(Debug, Default)]
pub struct PathGroup<'a> {
    pub defined: Vec<&'a StationPath>,
    pub undefined: Vec<&'a StationPath>,
    /// Paths starting at a buffer inside the station
    pub step_in: Vec<&'a StationPath>,
}

impl PathGroup<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.defined.len() + self.undefined.len() + self.step_in.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups the complete paths of a station by (origin, destination) label pair
#[derive(Debug, Default)]
pub struct StationPathsHelper<'a> {
    groups: IndexMap<(String, String), PathGroup<'a>>,
}

impl<'a> StationPathsHelper<'a> {
    pub fn new(all_paths: impl IntoIterator<Item = &'a StationPaths>) -> Self {
        let mut groups: IndexMap<(String, String), PathGroup<'a>> = IndexMap::new();

        for path in all_paths.into_iter().flat_map(StationPaths::complete_paths) {
            let group = groups.entry((path.label.clone(), path.out_label.clone())).or_default();
            if path.is_step_in() {
                group.step_in.push(path);
            } else if path.is_defined() {
                group.defined.push(path);
            } else {
                group.undefined.push(path);
            }
        }
        Self { groups }
    }

    #[must_use]
    pub fn group(&self, origin: &str, destination: &str) -> Option<&PathGroup<'a>> {
        self.groups.get(&(origin.to_string(), destination.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
