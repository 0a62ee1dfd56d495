/// Parallel file processing module for deflist
///
/// Documents are independent of each other, so several input files are transformed on
/// the rayon thread pool. Results always come back in input order.
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::time::Instant;

/// Configuration for parallel execution
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Enable/disable parallel execution
    pub enabled: bool,
    /// Minimum number of files to enable parallel execution
    pub min_file_count: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: cfg!(feature = "parallel"),
            min_file_count: 2,
        }
    }
}

/// File-level parallel processing for multiple files
pub struct FileParallelProcessor {
    config: ParallelConfig,
}

impl FileParallelProcessor {
    pub fn new(config: ParallelConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self::new(ParallelConfig::default())
    }

    /// Run `job` on every `(path, content)` pair, returning results in input order.
    pub fn process_files<T, F>(&self, files: &[(String, String)], job: F) -> Vec<(String, T)>
    where
        T: Send,
        F: Fn(&str, &str) -> T + Sync,
    {
        let run = |(path, content): &(String, String)| {
            let start = Instant::now();
            let result = job(path, content);
            let duration = start.elapsed();
            if duration.as_millis() > 1000 {
                log::debug!("File {path} took {duration:?}");
            }
            (path.clone(), result)
        };

        if !self.should_use_parallel(files) {
            return files.iter().map(run).collect();
        }

        #[cfg(feature = "parallel")]
        {
            files.par_iter().map(run).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            files.iter().map(run).collect()
        }
    }

    /// Determine if file-level parallel processing should be used
    pub fn should_use_parallel(&self, files: &[(String, String)]) -> bool {
        if !self.config.enabled || files.len() < self.config.min_file_count {
            return false;
        }

        #[cfg(feature = "parallel")]
        {
            rayon::current_num_threads() >= 2
        }
        #[cfg(not(feature = "parallel"))]
        {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(count: usize) -> Vec<(String, String)> {
        (0..count)
            .map(|i| (format!("doc{i}.md"), format!("Term {i}\n: Definition {i}\n")))
            .collect()
    }

    #[test]
    fn test_results_keep_input_order() {
        let processor = FileParallelProcessor::with_default_config();
        let inputs = files(32);
        let results = processor.process_files(&inputs, |_, content| content.len());
        let names: Vec<_> = results.iter().map(|(name, _)| name.clone()).collect();
        let expected: Vec<_> = inputs.iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(names, expected);
        assert!(results.iter().zip(&inputs).all(|((_, len), (_, content))| *len == content.len()));
    }

    #[test]
    fn test_single_file_runs_sequentially() {
        let processor = FileParallelProcessor::with_default_config();
        assert!(!processor.should_use_parallel(&files(1)));

        let disabled = FileParallelProcessor::new(ParallelConfig {
            enabled: false,
            min_file_count: 2,
        });
        assert!(!disabled.should_use_parallel(&files(8)));
    }
}
