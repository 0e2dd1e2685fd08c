//! Seams to the external topic pipeline.
//!
//! Embedding, clustering and dimensionality reduction are not done here.
//! Implementations of [`Embedder`], [`TopicClusterer`] and [`Projector`]
//! wrap whatever model does that work. [`TopicModel`] drives them over a
//! [`BuiltCorpus`] and merges their results back onto its records, one
//! result per record by position.

mod enrich;
mod error;

pub use enrich::{
    ChartRow, ExternalTopicRow, OUTLIER_TOPIC, TopicAssignment, TopicCount, TopicInfo, URL_FIELD,
    apply_topic_names, attach_topic_words, chart_rows, merge_external_rows, merge_projection,
    merge_topic_assignments, topic_frequency,
};
pub use error::TopicError;

use tracing::{info, instrument};

use crate::corpus::{BuiltCorpus, Projection, TopicWord};

/// Dense document vectors, one row per document.
pub type Embeddings = Vec<Vec<f32>>;

/// Turns documents into vectors.
pub trait Embedder {
    /// Encodes `documents`, returning one vector per document.
    fn encode(&self, documents: &[&str]) -> Result<Embeddings, TopicError>;
}

/// Groups embedded documents into topics.
pub trait TopicClusterer {
    /// Fits the model and returns one assignment per document.
    fn fit_transform(
        &mut self,
        documents: &[&str],
        embeddings: &Embeddings,
    ) -> Result<Vec<TopicAssignment>, TopicError>;

    /// Topic table of the last fit.
    fn topic_info(&self) -> Vec<TopicInfo>;

    /// Representative words of `topic` with their weights.
    fn topic_words(&self, topic: i64) -> Vec<TopicWord>;
}

/// Reduces embeddings to 2-D points for plotting.
pub trait Projector {
    /// Returns one point per embedding row.
    fn project(&self, embeddings: &Embeddings) -> Result<Vec<Projection>, TopicError>;
}

/// Runs a topic pipeline over a built corpus.
pub struct TopicModel<E, C> {
    corpus: BuiltCorpus,
    embedder: E,
    clusterer: C,
    embeddings: Option<Embeddings>,
}

impl<E: Embedder, C: TopicClusterer> TopicModel<E, C> {
    /// Wraps `corpus` with its collaborators; nothing is computed yet.
    #[must_use]
    pub fn new(corpus: BuiltCorpus, embedder: E, clusterer: C) -> Self {
        Self {
            corpus,
            embedder,
            clusterer,
            embeddings: None,
        }
    }

    /// Reuses embeddings from an earlier run instead of computing them.
    ///
    /// # Errors
    ///
    /// Returns [`TopicError::LengthMismatch`] unless there is one row per
    /// document.
    pub fn with_embeddings(mut self, embeddings: Embeddings) -> Result<Self, TopicError> {
        self.check_rows("embeddings", embeddings.len())?;
        self.embeddings = Some(embeddings);
        Ok(self)
    }

    /// Embeds the corpus documents and keeps the result.
    ///
    /// # Errors
    ///
    /// Propagates embedder failures and returns
    /// [`TopicError::LengthMismatch`] if the embedder returned the wrong
    /// number of rows.
    #[instrument(skip(self), fields(documents = self.corpus.len()))]
    pub fn run(&mut self) -> Result<&Embeddings, TopicError> {
        let embeddings = self.embedder.encode(&self.corpus.documents())?;
        self.check_rows("embeddings", embeddings.len())?;
        info!(rows = embeddings.len(), "Embedded corpus");
        Ok(&*self.embeddings.insert(embeddings))
    }

    /// Fits topics and merges `topic`, `probability`, `topic_name` and the
    /// topic words onto every record.
    ///
    /// # Errors
    ///
    /// Returns [`TopicError::MissingStep`] before [`run`](Self::run), and
    /// any merge error; on error no record is changed.
    #[instrument(skip(self), fields(documents = self.corpus.len()))]
    pub fn enrich(&mut self) -> Result<(), TopicError> {
        let embeddings = self.embeddings.as_ref().ok_or(TopicError::MissingStep {
            step: "enrich",
            missing: "embeddings",
        })?;
        let assignments = self
            .clusterer
            .fit_transform(&self.corpus.documents(), embeddings)?;
        let info = self.clusterer.topic_info();

        // Merge into a copy so a naming failure leaves no assignments behind.
        let mut corpus = self.corpus.corpus().clone();
        merge_topic_assignments(&mut corpus, &assignments)?;
        apply_topic_names(&mut corpus, &info)?;
        let clusterer = &self.clusterer;
        attach_topic_words(&mut corpus, |topic| clusterer.topic_words(topic));
        *self.corpus.corpus_mut() = corpus;

        info!(topics = info.len(), "Enriched corpus with topics");
        Ok(())
    }

    /// Projects the embeddings to 2-D and stores `dim0`/`dim1` on every
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`TopicError::MissingStep`] before [`run`](Self::run), and
    /// projector or length errors.
    pub fn compute_clusters<P: Projector>(&mut self, projector: &P) -> Result<(), TopicError> {
        let embeddings = self.embeddings.as_ref().ok_or(TopicError::MissingStep {
            step: "compute_clusters",
            missing: "embeddings",
        })?;
        let points = projector.project(embeddings)?;
        merge_projection(self.corpus.corpus_mut(), &points)
    }

    #[must_use]
    pub fn corpus(&self) -> &BuiltCorpus {
        &self.corpus
    }

    #[must_use]
    pub fn embeddings(&self) -> Option<&Embeddings> {
        self.embeddings.as_ref()
    }

    #[must_use]
    pub fn into_corpus(self) -> BuiltCorpus {
        self.corpus
    }

    fn check_rows(&self, what: &'static str, actual: usize) -> Result<(), TopicError> {
        if actual == self.corpus.len() {
            Ok(())
        } else {
            Err(TopicError::LengthMismatch {
                what,
                expected: self.corpus.len(),
                actual,
            })
        }
    }
}
