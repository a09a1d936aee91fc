use log::{debug, info, warn};
use std::collections::HashMap;
use std::io::{self, Write};

use crate::config::*;
use crate::transform::write_import_row;

/// Creates the destination of an output group.
///
/// The file-system implementation lives with the command line tool; tests use
/// in-memory buffers.
pub trait DestinationFactory {
    type Destination: Write;

    fn open(&mut self, key: &GroupKey) -> io::Result<Self::Destination>;
}

/// One import file being written.
#[derive(Debug)]
pub struct OutputGroup<W: Write> {
    key: GroupKey,
    destination: W,
    rows_written: u64,
}

impl<W: Write> OutputGroup<W> {
    fn create(key: GroupKey, mut destination: W, header: &[String]) -> io::Result<OutputGroup<W>> {
        write_import_row(&mut destination, header)?;
        Ok(OutputGroup {
            key,
            destination,
            rows_written: 0,
        })
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// Number of data rows, the header excluded.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn write_row(&mut self, fields: &[String]) -> Result<(), PipelineError> {
        write_import_row(&mut self.destination, fields).map_err(|source| PipelineError::Output {
            key: self.key.clone(),
            source,
        })?;
        self.rows_written += 1;
        Ok(())
    }

    fn close(mut self) -> (GroupSummary, io::Result<()>) {
        let res = self.destination.flush();
        let summary = GroupSummary {
            key: self.key,
            rows: self.rows_written,
        };
        // The destination is dropped here, which releases it.
        (summary, res)
    }
}

/// What was written in one group, once it has been closed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GroupSummary {
    pub key: GroupKey,
    pub rows: u64,
}

/// Owns all the open output groups, one per key, in creation order.
pub struct Router<F: DestinationFactory> {
    factory: F,
    header: Vec<String>,
    groups: Vec<OutputGroup<F::Destination>>,
    index: HashMap<GroupKey, usize>,
}

impl<F: DestinationFactory> Router<F> {
    /// `header` is the already translated header row written at the top of every group.
    pub fn new(factory: F, header: Vec<String>) -> Router<F> {
        Router {
            factory,
            header,
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns the group for `key`, creating its destination and writing its
    /// header the first time the key is seen.
    pub fn get_or_create(
        &mut self,
        key: &GroupKey,
    ) -> Result<&mut OutputGroup<F::Destination>, PipelineError> {
        let existing = self.index.get(key).copied();
        let idx = match existing {
            Some(idx) => idx,
            None => {
                info!("Creating import file for {}", key);
                let output_err = |source| PipelineError::Output {
                    key: key.clone(),
                    source,
                };
                let destination = self.factory.open(key).map_err(output_err)?;
                let group = OutputGroup::create(key.clone(), destination, &self.header)
                    .map_err(output_err)?;
                self.groups.push(group);
                let idx = self.groups.len() - 1;
                self.index.insert(key.clone(), idx);
                idx
            }
        };
        Ok(&mut self.groups[idx])
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.groups.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Flushes and releases every open group.
    ///
    /// All the groups are closed even if some of them fail; the first failure
    /// is returned. Calling it again has no effect.
    pub fn close_all(&mut self) -> Result<Vec<GroupSummary>, PipelineError> {
        self.index.clear();
        let mut summaries: Vec<GroupSummary> = Vec::new();
        let mut first_err: Option<PipelineError> = None;
        for group in self.groups.drain(..) {
            let (summary, res) = group.close();
            debug!("close_all: closed {} with {} rows", summary.key, summary.rows);
            if let Err(source) = res {
                warn!("Failed to close import file for {}: {}", summary.key, source);
                if first_err.is_none() {
                    first_err = Some(PipelineError::Output {
                        key: summary.key.clone(),
                        source,
                    });
                }
            }
            summaries.push(summary);
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(summaries),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Debug)]
    pub struct Shared {
        pub contents: HashMap<GroupKey, Vec<u8>>,
        pub opened: Vec<GroupKey>,
        pub flushed: Vec<GroupKey>,
    }

    /// Keeps every destination in memory so that tests can look at them after a run.
    #[derive(Clone, Default)]
    pub struct MemoryDestinations {
        pub shared: Rc<RefCell<Shared>>,
        pub fail_on: Option<String>,
    }

    #[derive(Debug)]
    pub struct MemoryDestination {
        key: GroupKey,
        shared: Rc<RefCell<Shared>>,
    }

    impl Write for MemoryDestination {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.shared
                .borrow_mut()
                .contents
                .entry(self.key.clone())
                .or_default()
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.shared.borrow_mut().flushed.push(self.key.clone());
            Ok(())
        }
    }

    impl DestinationFactory for MemoryDestinations {
        type Destination = MemoryDestination;

        fn open(&mut self, key: &GroupKey) -> io::Result<MemoryDestination> {
            if self.fail_on.as_deref() == Some(key.jurisdiction.as_str()) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            let mut shared = self.shared.borrow_mut();
            shared.opened.push(key.clone());
            shared.contents.insert(key.clone(), Vec::new());
            Ok(MemoryDestination {
                key: key.clone(),
                shared: self.shared.clone(),
            })
        }
    }

    impl MemoryDestinations {
        pub fn text(&self, key: &GroupKey) -> Option<String> {
            self.shared
                .borrow()
                .contents
                .get(key)
                .map(|b| String::from_utf8_lossy(b).to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn header() -> Vec<String> {
        vec!["VanID".to_string(), "Result".to_string(), "Z".to_string()]
    }

    fn fields(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn groups_are_created_once_with_a_header() {
        let dests = MemoryDestinations::default();
        let mut router = Router::new(dests.clone(), header());
        let ca = GroupKey::new("CA", Category::VoterFile);

        router
            .get_or_create(&ca)
            .unwrap()
            .write_row(&fields(&["1", "Busy", "Z"]))
            .unwrap();
        let group = router.get_or_create(&ca).unwrap();
        assert_eq!(group.rows_written(), 1);
        group.write_row(&fields(&["2", "Moved", "Z"])).unwrap();
        assert_eq!(router.len(), 1);
        assert_eq!(dests.shared.borrow().opened, vec![ca.clone()]);

        let summaries = router.close_all().unwrap();
        assert_eq!(summaries, vec![GroupSummary { key: ca.clone(), rows: 2 }]);
        assert_eq!(
            dests.text(&ca).unwrap(),
            "VanID\tResult\tZ\r\n1\tBusy\tZ\r\n2\tMoved\tZ\r\n"
        );
    }

    #[test]
    fn same_state_different_lists_are_separate_groups() {
        let dests = MemoryDestinations::default();
        let mut router = Router::new(dests.clone(), header());
        let myv = GroupKey::new("NY", Category::VoterFile);
        let myc = GroupKey::new("NY", Category::ContactList);
        router.get_or_create(&myc).unwrap();
        router.get_or_create(&myv).unwrap();
        assert_eq!(router.len(), 2);
        let summaries = router.close_all().unwrap();
        // Creation order is kept.
        assert_eq!(summaries[0].key, myc);
        assert_eq!(summaries[1].key, myv);
        // A group without data rows still has its header.
        assert_eq!(dests.text(&myv).unwrap(), "VanID\tResult\tZ\r\n");
    }

    #[test]
    fn close_all_flushes_each_group_once() {
        let dests = MemoryDestinations::default();
        let mut router = Router::new(dests.clone(), header());
        router.get_or_create(&GroupKey::new("CA", Category::VoterFile)).unwrap();
        router.get_or_create(&GroupKey::new("IA", Category::VoterFile)).unwrap();
        assert_eq!(router.close_all().unwrap().len(), 2);
        assert!(router.is_empty());
        assert!(router.close_all().unwrap().is_empty());
        assert_eq!(dests.shared.borrow().flushed.len(), 2);
    }

    #[test]
    fn failing_destination_is_reported() {
        let dests = MemoryDestinations {
            fail_on: Some("TX".to_string()),
            ..Default::default()
        };
        let mut router = Router::new(dests, header());
        let err = router
            .get_or_create(&GroupKey::new("TX", Category::VoterFile))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Output { ref key, .. } if key.jurisdiction == "TX"));
        assert!(router.is_empty());
    }
}
