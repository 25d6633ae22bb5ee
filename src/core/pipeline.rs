use crate::core::extractor::ListingExtractor;
use crate::core::output;
use crate::core::{ConfigProvider, PageExtraction, Pipeline, Storage, TransformResult};
use crate::domain::model::{ListingFailure, OutputArtifact};
use crate::domain::settings::{FailurePolicy, OutputFormat};
use crate::utils::error::{EtlError, Result};
use scraper::Html;
use std::io::Write;
use std::sync::Arc;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Reads saved listing pages from `source` and writes the rendered outputs to `sink`.
pub struct ListingPipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
    extractor: Arc<ListingExtractor>,
}

impl<S: Storage, C: ConfigProvider> ListingPipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Self {
        let extractor = Arc::new(ListingExtractor::new(config.markers().clone()));
        Self {
            source,
            sink,
            config,
            extractor,
        }
    }

    async fn read_page(&self, file: &str) -> Result<Vec<u8>> {
        self.source.read_file(file).await.map_err(|e| match e {
            EtlError::IoError(source) => EtlError::InputReadError {
                path: file.to_string(),
                source,
            },
            other => other,
        })
    }
}

fn extract_page(
    extractor: &ListingExtractor,
    bytes: &[u8],
    page: String,
    policy: FailurePolicy,
) -> std::result::Result<PageExtraction, ListingFailure> {
    let html = String::from_utf8_lossy(bytes);
    match policy {
        FailurePolicy::Skip => Ok(extractor.extract_html(&html, &page)),
        FailurePolicy::Abort => {
            let document = Html::parse_document(&html);
            let listings = extractor.extract_strict(&document, &page)?;
            Ok(PageExtraction {
                page,
                listings,
                failures: Vec::new(),
            })
        }
    }
}

fn bundle(artifacts: &[OutputArtifact]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for artifact in artifacts {
        zip.start_file(artifact.filename.as_str(), SimpleFileOptions::default())?;
        zip.write_all(artifact.contents.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ListingPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<PageExtraction>> {
        let files = self.config.input_files();
        let policy = self.config.failure_policy();
        let batch_size = self.config.concurrent_documents().max(1);

        if files.is_empty() {
            tracing::warn!("No input pages configured");
        }

        let mut pages = Vec::with_capacity(files.len());

        // Pages in a batch are parsed in parallel; results keep input order
        for batch in files.chunks(batch_size) {
            let mut handles = Vec::with_capacity(batch.len());

            for file in batch {
                let bytes = self.read_page(file).await?;
                tracing::debug!("Read {} ({} bytes)", file, bytes.len());

                let extractor = Arc::clone(&self.extractor);
                let page = file.clone();
                handles.push(tokio::task::spawn_blocking(move || {
                    extract_page(&extractor, &bytes, page, policy)
                }));
            }

            for handle in handles {
                let page = handle.await??;
                tracing::info!(
                    "📄 {}: {} listings, {} sales, {} skipped",
                    page.page,
                    page.listings.len(),
                    page.sale_count(),
                    page.failures.len()
                );
                pages.push(page);
            }
        }

        Ok(pages)
    }

    async fn transform(&self, pages: Vec<PageExtraction>) -> Result<TransformResult> {
        let mut listings = Vec::new();
        let mut failures = Vec::new();
        for page in pages {
            listings.extend(page.listings);
            failures.extend(page.failures);
        }

        let filenames = self.config.filenames();
        let mut artifacts = Vec::new();

        for format in self.config.output_formats() {
            match format {
                OutputFormat::Json => {
                    artifacts.push(OutputArtifact::new(&filenames.json, output::to_json(&listings)?));
                }
                OutputFormat::Csv => {
                    artifacts.push(OutputArtifact::new(&filenames.csv, output::to_csv(&listings)?));
                }
                OutputFormat::EncodedCsv => {
                    let (csv, tables) = output::to_encoded_csv(&listings)?;
                    tracing::debug!(
                        "Encoded {} postcodes, {} property types, {} tenures",
                        tables.postcode.len(),
                        tables.property_type.len(),
                        tables.tenure.len()
                    );
                    artifacts.push(OutputArtifact::new(&filenames.encoded_csv, csv));
                    artifacts.extend(output::lookup_tables(&tables)?);
                }
            }
        }

        if !failures.is_empty() {
            tracing::warn!(
                "⚠️ {} listings were skipped, see {}",
                failures.len(),
                filenames.failures
            );
            artifacts.push(OutputArtifact::new(
                &filenames.failures,
                output::failures_to_json(&failures)?,
            ));
        }

        Ok(TransformResult {
            listings,
            failures,
            artifacts,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        if let Some(archive) = self.config.bundle_filename() {
            tracing::debug!("Creating ZIP file with {} files", result.artifacts.len());
            let zip_data = bundle(&result.artifacts)?;

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.sink.write_file(archive, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), archive));
        }

        for artifact in &result.artifacts {
            tracing::debug!("Writing {}", artifact.filename);
            self.sink
                .write_file(&artifact.filename, artifact.contents.as_bytes())
                .await?;
        }

        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::markers::MarkerSet;
    use crate::domain::settings::OutputFilenames;
    use crate::utils::error::ExtractionError;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put(&self, path: &str, data: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn file_names(&self) -> Vec<String> {
            let files = self.files.lock().await;
            let mut names: Vec<String> = files.keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input_files: Vec<String>,
        failure_policy: FailurePolicy,
        output_formats: Vec<OutputFormat>,
        bundle: Option<String>,
        markers: MarkerSet,
        filenames: OutputFilenames,
    }

    impl MockConfig {
        fn new(input_files: &[&str]) -> Self {
            Self {
                input_files: input_files.iter().map(|f| f.to_string()).collect(),
                failure_policy: FailurePolicy::Skip,
                output_formats: OutputFormat::ALL.to_vec(),
                bundle: None,
                markers: MarkerSet::default(),
                filenames: OutputFilenames::default(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_dir(&self) -> &str {
            "pages"
        }

        fn input_files(&self) -> Vec<String> {
            self.input_files.clone()
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn concurrent_documents(&self) -> usize {
            2
        }

        fn failure_policy(&self) -> FailurePolicy {
            self.failure_policy
        }

        fn output_formats(&self) -> Vec<OutputFormat> {
            self.output_formats.clone()
        }

        fn markers(&self) -> &MarkerSet {
            &self.markers
        }

        fn filenames(&self) -> &OutputFilenames {
            &self.filenames
        }

        fn bundle_filename(&self) -> Option<&str> {
            self.bundle.as_deref()
        }
    }

    fn card(title: &str, subtitle: &str, rows: &[(&str, &str, &str)]) -> String {
        let rows: String = rows
            .iter()
            .map(|(price, date, tenure)| {
                format!(
                    r#"<tr><td class="price">{}</td><td class="date-sold">{}</td><td class="table-extra tenure">{}</td></tr>"#,
                    price, date, tenure
                )
            })
            .collect();
        format!(
            r#"<div class="propertyCard"><div class="propertyCard-content">
<h2 class="title clickable">{}</h2>{}
<div class="transaction-table-container"><table>{}</table></div>
</div></div>"#,
            title, subtitle, rows
        )
    }

    fn page(cards: &[String]) -> String {
        format!(
            r#"<html><body><div class="main-content">{}</div></body></html>"#,
            cards.concat()
        )
    }

    async fn seeded_source() -> MockStorage {
        let source = MockStorage::new();
        source
            .put(
                "rm-pg1.html",
                &page(&[
                    card(
                        "1 Abbey Street, Chester CH1 2JD",
                        r#"<div class="subTitle bedrooms">3 bed, Terraced</div>"#,
                        &[("£300,000", "1 Jun 2021", "Freehold"), ("£150,000", "12 Mar 2009", "Freehold")],
                    ),
                    card(
                        "Flat 2, The Old Mill, Chester CH4 7AB",
                        r#"<div class="subTitle ">Studio</div>"#,
                        &[],
                    ),
                ]),
            )
            .await;
        source
            .put(
                "rm-pg2.html",
                &page(&[
                    card(
                        "9 Bad Lane, Chester CH3 5AA",
                        r#"<div class="subTitle bedrooms">2 bed, Flat</div>"#,
                        &[("£1,000", "last spring", "Leasehold")],
                    ),
                    card(
                        "4 Water Tower Street, Chester CH1 4EH",
                        r#"<div class="subTitle bedrooms">2 bed, Flat</div>"#,
                        &[("£210,000", "3 Jan 2020 (New Build)", "Leasehold")],
                    ),
                ]),
            )
            .await;
        source
    }

    #[tokio::test]
    async fn test_extract_keeps_page_order() {
        let source = seeded_source().await;
        let config = MockConfig::new(&["rm-pg2.html", "rm-pg1.html"]);
        let pipeline = ListingPipeline::new(source, MockStorage::new(), config);

        let pages = pipeline.extract().await.unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page, "rm-pg2.html");
        assert_eq!(pages[0].listings.len(), 1);
        assert_eq!(pages[0].failures.len(), 1);
        assert_eq!(pages[1].page, "rm-pg1.html");
        assert_eq!(pages[1].listings.len(), 2);
        assert_eq!(pages[1].listings[1].bedroom_count, 1);
    }

    #[tokio::test]
    async fn test_extract_missing_page_is_fatal() {
        let source = seeded_source().await;
        let config = MockConfig::new(&["rm-pg1.html", "rm-pg9.html"]);
        let pipeline = ListingPipeline::new(source, MockStorage::new(), config);

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::InputReadError { ref path, .. } if path == "rm-pg9.html"));
    }

    #[tokio::test]
    async fn test_abort_policy_stops_on_malformed_listing() {
        let source = seeded_source().await;
        let mut config = MockConfig::new(&["rm-pg1.html", "rm-pg2.html"]);
        config.failure_policy = FailurePolicy::Abort;
        let pipeline = ListingPipeline::new(source, MockStorage::new(), config);

        let err = pipeline.extract().await.unwrap_err();
        match err {
            EtlError::Extraction(failure) => {
                assert_eq!(failure.page, "rm-pg2.html");
                assert_eq!(failure.card_index, 0);
                assert!(matches!(failure.error, ExtractionError::InvalidDate { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_transform_renders_all_formats_and_failure_report() {
        let source = seeded_source().await;
        let config = MockConfig::new(&["rm-pg1.html", "rm-pg2.html"]);
        let pipeline = ListingPipeline::new(source, MockStorage::new(), config);

        let pages = pipeline.extract().await.unwrap();
        let result = pipeline.transform(pages).await.unwrap();

        assert_eq!(result.listings.len(), 3);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.artifacts.len(), 10);

        let csv = &result.artifact("house-data.csv").unwrap().contents;
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "CH1,3,Terraced,2,300000,2021,Freehold");
        assert_eq!(lines[3], "CH1,2,Flat,1,210000,2020,Leasehold");

        let encoded = &result.artifact("encoded-house-data.csv").unwrap().contents;
        assert_eq!(encoded.lines().nth(3), Some("0,2,1,1,210000,2020,1"));

        assert!(result.artifact("extraction-errors.json").is_some());
    }

    #[tokio::test]
    async fn test_transform_selected_formats_only() {
        let source = seeded_source().await;
        let mut config = MockConfig::new(&["rm-pg1.html"]);
        config.output_formats = vec![OutputFormat::Json];
        let pipeline = ListingPipeline::new(source, MockStorage::new(), config);

        let pages = pipeline.extract().await.unwrap();
        let result = pipeline.transform(pages).await.unwrap();

        assert_eq!(result.artifacts.len(), 1);
        assert_eq!(result.artifacts[0].filename, "house-data.json");
    }

    #[tokio::test]
    async fn test_load_writes_each_artifact() {
        let sink = MockStorage::new();
        let config = MockConfig::new(&[]);
        let pipeline = ListingPipeline::new(MockStorage::new(), sink.clone(), config);

        let result = TransformResult {
            listings: vec![],
            failures: vec![],
            artifacts: vec![
                OutputArtifact::new("house-data.json", "[]"),
                OutputArtifact::new("house-data.csv", "header\n"),
            ],
        };

        let output_path = pipeline.load(result).await.unwrap();

        assert_eq!(output_path, "test_output");
        assert_eq!(sink.file_names().await, vec!["house-data.csv", "house-data.json"]);
        assert_eq!(sink.get_file("house-data.json").await.unwrap(), b"[]".to_vec());
    }

    #[tokio::test]
    async fn test_load_bundles_into_zip() {
        let sink = MockStorage::new();
        let mut config = MockConfig::new(&[]);
        config.bundle = Some("house-data.zip".to_string());
        let pipeline = ListingPipeline::new(MockStorage::new(), sink.clone(), config);

        let result = TransformResult {
            listings: vec![],
            failures: vec![],
            artifacts: vec![
                OutputArtifact::new("house-data.json", "[]"),
                OutputArtifact::new("decodeTenure.json", "{}"),
            ],
        };

        let output_path = pipeline.load(result).await.unwrap();
        assert_eq!(output_path, "test_output/house-data.zip");
        assert_eq!(sink.file_names().await, vec!["house-data.zip"]);

        let zip_bytes = sink.get_file("house-data.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = String::new();
        std::io::Read::read_to_string(&mut archive.by_name("decodeTenure.json").unwrap(), &mut content)
            .unwrap();
        assert_eq!(content, "{}");
    }
}
