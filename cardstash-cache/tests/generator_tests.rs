use cardstash_cache::{parse_generator_output, GeneratorConfig};

// ── Output parsing ───────────────────────────────────────────────

#[test]
fn parses_success_payload() {
    let payload = parse_generator_output("SUCCESS:{\"cards\":2}\n").unwrap();
    assert_eq!(payload, "{\"cards\":2}");
}

#[test]
fn uses_last_non_empty_line() {
    let stdout = "loading fonts...\nSUCCESS:/tmp/card.png\n\n";
    assert_eq!(parse_generator_output(stdout).unwrap(), "/tmp/card.png");
}

#[test]
fn error_marker_is_an_error() {
    let err = parse_generator_output("ERROR:Character 1004 not found in showcase").unwrap_err();
    assert!(err.to_string().contains("Character 1004 not found"));
}

#[test]
fn malformed_output_is_an_error() {
    let err = parse_generator_output("Traceback (most recent call last):").unwrap_err();
    assert!(err.to_string().contains("malformed"));
}

#[test]
fn empty_output_is_an_error() {
    assert!(parse_generator_output("").is_err());
    assert!(parse_generator_output("\n  \n").is_err());
}

#[test]
fn generator_config_defaults() {
    let cfg = GeneratorConfig::default();
    assert_eq!(cfg.program, "python");
    assert_eq!(cfg.locale, "cht");
    assert_eq!(cfg.template, 2);
}

// ── Child process ────────────────────────────────────────────────

#[cfg(unix)]
mod process {
    use cardstash_cache::{
        ArtifactGenerator, GenerationRequest, GenerationTarget, GeneratorConfig, ProcessGenerator,
    };
    use cardstash_types::{Entity, EntityId, OwnerId};
    use tempfile::TempDir;

    /// Runs `script` through `sh -c`, so `$1` is `generate`, `$2` the owner,
    /// `$4` the output directory and `$9` the target flag.
    fn shell(script: &str) -> ProcessGenerator {
        ProcessGenerator::new(GeneratorConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string(), "generator".to_string()],
            ..Default::default()
        })
    }

    fn request(dir: &TempDir, target: GenerationTarget) -> GenerationRequest {
        GenerationRequest {
            owner: OwnerId::parse("800123456").unwrap(),
            output_dir: dir.path().to_path_buf(),
            entities: vec![Entity::new(EntityId::parse("1004").unwrap(), "Welt")],
            target,
        }
    }

    #[tokio::test]
    async fn passes_protocol_arguments() {
        let dir = TempDir::new().unwrap();
        let generator = shell(r#"echo "SUCCESS:$1|$2|$3|$5|$6|$7|$8|$9""#);

        let report = generator
            .generate(request(&dir, GenerationTarget::All))
            .await
            .unwrap();
        assert_eq!(
            report.payload,
            "generate|800123456|--output|--lang|cht|--template|2|--all"
        );
    }

    #[tokio::test]
    async fn single_target_passes_character_id() {
        let dir = TempDir::new().unwrap();
        let generator = shell(r#"shift 8; echo "SUCCESS:$1=$2""#);
        let target = GenerationTarget::Single(EntityId::parse("1004").unwrap());

        let report = generator.generate(request(&dir, target)).await.unwrap();
        assert_eq!(report.payload, "--character_id=1004");
    }

    #[tokio::test]
    async fn writes_entities_to_stdin() {
        let dir = TempDir::new().unwrap();
        let generator = shell(r#"cat > "$4/entities.json"; touch "$4/1004.png"; echo SUCCESS:ok"#);

        generator
            .generate(request(&dir, GenerationTarget::All))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("entities.json")).unwrap();
        let entities: Vec<Entity> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entities[0].name, "Welt");
        assert!(dir.path().join("1004.png").exists());
    }

    #[tokio::test]
    async fn error_line_fails() {
        let dir = TempDir::new().unwrap();
        let generator = shell("echo ERROR:Player does not exist");

        let err = generator
            .generate(request(&dir, GenerationTarget::All))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Player does not exist"));
    }

    #[tokio::test]
    async fn nonzero_exit_fails_even_with_success_line() {
        let dir = TempDir::new().unwrap();
        let generator = shell("echo SUCCESS:ok; exit 3");

        let err = generator
            .generate(request(&dir, GenerationTarget::All))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exited"));
    }

    #[tokio::test]
    async fn nonzero_exit_reports_stderr() {
        let dir = TempDir::new().unwrap();
        let generator = shell("echo 'ModuleNotFoundError: starrailcard' >&2; exit 1");

        let err = generator
            .generate(request(&dir, GenerationTarget::All))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("starrailcard"));
    }

    #[tokio::test]
    async fn missing_program_fails() {
        let dir = TempDir::new().unwrap();
        let generator = ProcessGenerator::new(GeneratorConfig {
            program: "/nonexistent/cardstash-generator".to_string(),
            args: vec![],
            ..Default::default()
        });

        let err = generator
            .generate(request(&dir, GenerationTarget::All))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }
}
