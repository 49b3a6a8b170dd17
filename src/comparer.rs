//! The high-level API for comparing a consumer schema with a producer schema.

use crate::compat::{Compatibility, Comparison, Side};
use crate::config::ComparerConfig;
use crate::descriptor::DescriptorTree;
use crate::error::{CompareError, Result};
use crate::loader;
use crate::source::{DirectoryFileSystem, FileSystem, SchemaSource};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// One side of the comparison: its source and the lazily parsed tree.
#[derive(Debug)]
struct Schema {
    source: SchemaSource,
    tree: OnceLock<Result<DescriptorTree>>,
}

impl Schema {
    fn new(source: SchemaSource) -> Self {
        Self {
            source,
            tree: OnceLock::new(),
        }
    }

    /// Parses on first use. Concurrent first callers block until the single
    /// parse finishes; a failed parse is cached and reported to every caller.
    fn tree(
        &self,
        file_system: Option<&dyn FileSystem>,
        config: &ComparerConfig,
    ) -> Result<&DescriptorTree> {
        self.tree
            .get_or_init(|| {
                loader::load_tree(&self.source, file_system, config)
                    .map_err(|e| CompareError::malformed(self.source.name(), &e))
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

/// Compares two versions of a schema: the consumer's and the producer's.
///
/// Both sources are parsed at most once, on first use, and the comparer is
/// read-only afterwards; it can be shared across threads and every
/// comparison call is independent.
///
/// # Example
///
/// ```
/// use proto_compat::{Compatibility, ContractComparer, SchemaSource};
///
/// let consumer = SchemaSource::new("a.proto", "syntax = \"proto3\"; message M { int32 x = 1; }");
/// let producer = SchemaSource::new(
///     "b.proto",
///     "syntax = \"proto3\"; message M { int32 x = 1; int32 y = 2; }",
/// );
/// let comparer = ContractComparer::new(consumer, producer)?;
/// assert_eq!(comparer.compare_message_type("M", "M")?, Compatibility::SubSet);
/// # Ok::<(), proto_compat::CompareError>(())
/// ```
pub struct ContractComparer {
    consumer: Schema,
    producer: Schema,
    file_system: Option<Arc<dyn FileSystem>>,
    config: ComparerConfig,
}

impl std::fmt::Debug for ContractComparer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractComparer")
            .field("consumer", &self.consumer.source.name())
            .field("producer", &self.producer.source.name())
            .field("file_system", &self.file_system.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl ContractComparer {
    /// Creates a comparer. Fails if either source has a blank name.
    pub fn new(consumer: SchemaSource, producer: SchemaSource) -> Result<Self> {
        require_name("consumer source name", consumer.name())?;
        require_name("producer source name", producer.name())?;
        Ok(Self {
            consumer: Schema::new(consumer),
            producer: Schema::new(producer),
            file_system: None,
            config: ComparerConfig::default(),
        })
    }

    /// Resolves imports through `file_system`.
    pub fn with_file_system<F: FileSystem + 'static>(self, file_system: F) -> Self {
        self.with_shared_file_system(Arc::new(file_system))
    }

    pub fn with_shared_file_system(mut self, file_system: Arc<dyn FileSystem>) -> Self {
        self.file_system = Some(file_system);
        self
    }

    /// Applies `config`. Its import roots become a [`DirectoryFileSystem`]
    /// unless a file system was already injected.
    pub fn with_config(mut self, config: ComparerConfig) -> Self {
        if self.file_system.is_none() && !config.import_roots.is_empty() {
            self.file_system = Some(Arc::new(DirectoryFileSystem::new(
                config.import_roots.iter().cloned(),
            )));
        }
        self.config = config;
        self
    }

    pub fn consumer(&self) -> &SchemaSource {
        &self.consumer.source
    }

    pub fn producer(&self) -> &SchemaSource {
        &self.producer.source
    }

    pub fn config(&self) -> &ComparerConfig {
        &self.config
    }

    /// The consumer's parsed tree, building it if needed.
    pub fn consumer_tree(&self) -> Result<&DescriptorTree> {
        self.consumer.tree(self.file_system.as_deref(), &self.config)
    }

    /// The producer's parsed tree, building it if needed.
    pub fn producer_tree(&self) -> Result<&DescriptorTree> {
        self.producer.tree(self.file_system.as_deref(), &self.config)
    }

    /// Compares message `consumer_type` of the consumer schema with message
    /// `producer_type` of the producer schema.
    pub fn compare_message_type(
        &self,
        consumer_type: &str,
        producer_type: &str,
    ) -> Result<Compatibility> {
        require_name("consumer type name", consumer_type)?;
        require_name("producer type name", producer_type)?;

        let mut comparison = self.comparison()?;
        let consumer = comparison.consumer().message(consumer_type)?;
        let producer = comparison.producer().message(producer_type)?;
        let verdict = comparison.compare_message(consumer, producer)?;

        debug!(consumer_type, producer_type, %verdict, "Compared message types");
        Ok(verdict)
    }

    /// Compares enum `consumer_type` with enum `producer_type`.
    pub fn compare_enum_type(
        &self,
        consumer_type: &str,
        producer_type: &str,
    ) -> Result<Compatibility> {
        require_name("consumer type name", consumer_type)?;
        require_name("producer type name", producer_type)?;

        let mut comparison = self.comparison()?;
        let consumer = comparison.consumer().enumeration(consumer_type)?;
        let producer = comparison.producer().enumeration(producer_type)?;
        let verdict = comparison.compare_enum(consumer, producer)?;

        debug!(consumer_type, producer_type, %verdict, "Compared enum types");
        Ok(verdict)
    }

    /// Compares service `consumer_service` with service `producer_service`.
    pub fn compare_service(
        &self,
        consumer_service: &str,
        producer_service: &str,
    ) -> Result<Compatibility> {
        require_name("consumer service name", consumer_service)?;
        require_name("producer service name", producer_service)?;

        let mut comparison = self.comparison()?;
        let consumer = comparison.consumer().service(consumer_service)?;
        let producer = comparison.producer().service(producer_service)?;
        let verdict = comparison.compare_service(consumer, producer)?;

        debug!(consumer_service, producer_service, %verdict, "Compared services");
        Ok(verdict)
    }

    /// Compares every top-level message, enum and service of the two files.
    /// Identical sources are `Equal` without being parsed.
    pub fn compare_schemas(&self) -> Result<Compatibility> {
        if self.consumer.source == self.producer.source {
            debug!(schema = self.consumer.source.name(), "Identical sources");
            return Ok(Compatibility::Equal);
        }

        let verdict = self.comparison()?.compare_roots()?;
        debug!(
            consumer = self.consumer.source.name(),
            producer = self.producer.source.name(),
            %verdict,
            "Compared schemas"
        );
        Ok(verdict)
    }

    fn comparison(&self) -> Result<Comparison<'_>> {
        Ok(Comparison::new(
            Side::new(self.consumer_tree()?, self.consumer.source.name()),
            Side::new(self.producer_tree()?, self.producer.source.name()),
        ))
    }
}

fn require_name(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CompareError::InvalidArgument(format!("{what} must not be blank")));
    }
    Ok(())
}
