//! Test Helper Utilities
//!
//! Shared fakes for testing sentiflow-ingest

use async_trait::async_trait;
use sentiflow_common::models::CanonicalPost;
use sentiflow_common::transport::PostPublisher;
use sentiflow_common::{Error, Result};
use std::path::Path;
use std::sync::Mutex;

/// Publisher that records every post; fails for ids listed in `fail_ids`
#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<CanonicalPost>>,
    pub fail_ids: Vec<String>,
}

impl RecordingPublisher {
    pub fn failing_on(ids: &[&str]) -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn posts(&self) -> Vec<CanonicalPost> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostPublisher for RecordingPublisher {
    async fn publish(&self, post: &CanonicalPost) -> Result<String> {
        if self.fail_ids.contains(&post.id) {
            return Err(Error::Transport(format!("refused {}", post.id)));
        }
        let mut published = self.published.lock().unwrap();
        published.push(post.clone());
        Ok(format!("msg-{}", published.len()))
    }
}

/// Write a dataset object under `<root>/<bucket>/<object>`
pub fn write_object(root: &Path, bucket: &str, object: &str, content: &[u8]) {
    let path = root.join(bucket).join(object);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

pub const SAMPLE_DATASET: &str = concat!(
    "\"0\",\"123\",\"Mon May 11 03:17:40 UTC 2009\",\"NO_QUERY\",\"alice\",\"I hate this http://x.com\"\n",
    "\n",
    "\"4\",\"124\",\"Mon May 11 03:18:01 UTC 2009\",\"NO_QUERY\",\"bob\",\"What a lovely day\"\n",
    "\"4\",\"125\",\"Mon May 11 03:18:09 UTC 2009\",\"NO_QUERY\",\"carol\"\n",
    "\"x\",\"126\",\"Mon May 11 03:18:20 UTC 2009\",\"NO_QUERY\",\"dave\",\"bad label\"\n",
    "\"2\",\"127\",\"Mon May 11 03:19:00 UTC 2009\",\"NO_QUERY\",\"erin\",\"Just a regular tuesday\"\n",
);
