//! End-to-end pipeline runs against mock HTTP sources.

use md5::{Digest, Md5};
use rpz_core::{Output, PolicyAction, RpzError, Source, SourceFormat};
use rpz_fetch::LineFetcher;
use rpz_pipeline::{run, PipelineConfig};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

struct Fixture {
    server: MockServer,
    dir: TempDir,
}

impl Fixture {
    async fn new() -> Self {
        let server = MockServer::start().await;
        // Narrower wildcard arrives before its broader cousin; the second
        // pass must still collapse the pair.
        mount(
            &server,
            "/wildcards.txt",
            "tracker.ads.example.com\nads.example.com\n",
        )
        .await;
        mount(
            &server,
            "/hosts.txt",
            "# sinkhole feed\n\
             0.0.0.0 0.0.0.0\n\
             0.0.0.0 doubleclick.example.net\n\
             0.0.0.0 tracker.ads.example.com\n\
             0.0.0.0 doubleclick.example.net\n",
        )
        .await;
        mount(
            &server,
            "/zone.rpz",
            "adserver.example.org CNAME .\n*.skip.example.org CNAME .\nmalformed line here\n",
        )
        .await;
        Self {
            server,
            dir: TempDir::new().unwrap(),
        }
    }

    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            sources: vec![
                Source::new(
                    format!("{}/wildcards.txt", self.server.uri()),
                    SourceFormat::WildcardDomains,
                ),
                Source::new(format!("{}/hosts.txt", self.server.uri()), SourceFormat::Hosts),
                Source::new(
                    format!("{}/zone.rpz", self.server.uri()),
                    SourceFormat::RpzPlain,
                ),
            ],
            outputs: vec![
                Output::new(self.dir.path().join("nx.rpz"), PolicyAction::Nxdomain),
                Output::new(self.dir.path().join("null.rpz"), PolicyAction::NullRoute),
            ],
            name_server: "ns1.example.com".to_string(),
            email: "hostmaster@example.com".to_string(),
        }
    }
}

fn rule_section(content: &str) -> Vec<&str> {
    // Rules sit between the blank line after ` NS localhost.` and the blank
    // line before the digest trailer.
    let lines: Vec<&str> = content.lines().collect();
    let ns = lines.iter().position(|l| *l == " NS localhost.").unwrap();
    let trailer_sep = lines.len() - 2;
    lines[ns + 2..trailer_sep].to_vec()
}

#[tokio::test]
async fn full_run_builds_both_destinations() {
    let fixture = Fixture::new().await;
    let fetcher = LineFetcher::new();

    let report = run(&fetcher, &fixture.config()).await.unwrap();
    assert_eq!(report.wildcards, 1);
    assert_eq!(report.accepted, 3);
    assert!(report.published.iter().all(|(_, replaced)| *replaced));

    let nx = std::fs::read_to_string(fixture.dir.path().join("nx.rpz")).unwrap();
    assert_eq!(
        rule_section(&nx),
        [
            "*.ads.example.com CNAME .",
            "doubleclick.example.net CNAME .",
            "adserver.example.org CNAME .",
        ]
    );

    let null = std::fs::read_to_string(fixture.dir.path().join("null.rpz")).unwrap();
    assert_eq!(
        rule_section(&null),
        [
            "*.ads.example.com A 0.0.0.0",
            "doubleclick.example.net A 0.0.0.0",
            "adserver.example.org A 0.0.0.0",
        ]
    );

    // The literal covered by the wildcard never reaches any output.
    assert!(!nx.contains("tracker.ads.example.com"));

    // Header carries one comment per source, numbered in processing order.
    assert!(nx.contains("; Source #1:"));
    assert!(nx.contains("; Source #3:"));
    assert!(nx.contains("@ IN SOA ns1.example.com. hostmaster.example.com. ("));
}

#[tokio::test]
async fn digest_covers_exactly_the_accepted_sequence() {
    let fixture = Fixture::new().await;
    let fetcher = LineFetcher::new();

    let report = run(&fetcher, &fixture.config()).await.unwrap();

    let mut expected = Md5::new();
    expected.update(b"*.ads.example.com");
    expected.update(b"doubleclick.example.net");
    expected.update(b"adserver.example.org");
    let expected = hex::encode(expected.finalize());

    assert_eq!(report.digest, expected);
    let nx = std::fs::read_to_string(fixture.dir.path().join("nx.rpz")).unwrap();
    assert!(nx.ends_with(&format!("; md5sum: {expected}\n")));
}

#[tokio::test]
async fn second_run_with_unchanged_sources_is_a_no_op() {
    let fixture = Fixture::new().await;
    let fetcher = LineFetcher::new();
    let config = fixture.config();

    let first = run(&fetcher, &config).await.unwrap();
    assert!(first.published.iter().all(|(_, replaced)| *replaced));
    let before = std::fs::read_to_string(fixture.dir.path().join("nx.rpz")).unwrap();

    let second = run(&fetcher, &config).await.unwrap();
    assert_eq!(first.digest, second.digest);
    assert!(second.published.iter().all(|(_, replaced)| !*replaced));

    let after = std::fs::read_to_string(fixture.dir.path().join("nx.rpz")).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn no_domain_appears_twice_in_an_output() {
    let fixture = Fixture::new().await;
    let fetcher = LineFetcher::new();

    run(&fetcher, &fixture.config()).await.unwrap();

    let nx = std::fs::read_to_string(fixture.dir.path().join("nx.rpz")).unwrap();
    let rules = rule_section(&nx);
    let mut deduped = rules.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(deduped.len(), rules.len());
}

#[tokio::test]
async fn fetch_failure_aborts_without_publishing() {
    let fixture = Fixture::new().await;
    let fetcher = LineFetcher::new();

    let mut config = fixture.config();
    config.sources.push(Source::new(
        format!("{}/missing.txt", fixture.server.uri()),
        SourceFormat::Domains,
    ));

    let result = run(&fetcher, &config).await;
    assert!(matches!(result, Err(RpzError::Fetch { .. })));

    // No destination was created and no temp file was left behind.
    assert!(!fixture.dir.path().join("nx.rpz").exists());
    assert!(!fixture.dir.path().join("null.rpz").exists());
    assert_eq!(std::fs::read_dir(fixture.dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn run_without_wildcard_sources_skips_the_pre_pass() {
    let server = MockServer::start().await;
    mount(&server, "/plain.txt", "ads.example.com\nads.example.com\n").await;
    let dir = TempDir::new().unwrap();

    let config = PipelineConfig {
        sources: vec![Source::new(
            format!("{}/plain.txt", server.uri()),
            SourceFormat::Domains,
        )],
        outputs: vec![Output::new(dir.path().join("zone.rpz"), PolicyAction::Nxdomain)],
        name_server: "ns1.example.com".to_string(),
        email: "hostmaster@example.com".to_string(),
    };

    let fetcher = LineFetcher::new();
    let report = run(&fetcher, &config).await.unwrap();
    assert_eq!(report.wildcards, 0);
    assert_eq!(report.accepted, 1);

    let zone = std::fs::read_to_string(dir.path().join("zone.rpz")).unwrap();
    assert_eq!(rule_section(&zone), ["ads.example.com CNAME ."]);
}
