mod cli {
    #![allow(non_snake_case)]

    use assert_cmd::prelude::*;
    use predicates::str::contains;

    use std::fs;
    use std::process::Command;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const NAME: &str = "presale_trend";

    const SAMPLE: &str = "지역명,규모구분,연도,월,분양가격\n\
                          서울,전체,2024,1,\"1,000\"\n\
                          서울,전체,2025,1,\"1,100\"\n\
                          부산,전체,2025,1,700\n";

    fn data_dir() -> Result<tempfile::TempDir, Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("한국부동산 가격 데이터.csv"), SAMPLE)?;
        Ok(dir)
    }

    #[test]
    fn test_output__when_no_command_provided() -> TestResult {
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.assert().failure();
        Ok(())
    }

    #[test]
    fn test_inspect__finds_default_file() -> TestResult {
        let dir = data_dir()?;
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.arg("inspect").arg("--dir").arg(dir.path());

        cmd.assert()
            .success()
            .stdout(contains("Encoding: utf-8-sig"))
            .stdout(contains("3 raw, 3 kept, 0 dropped"))
            .stdout(contains("Regions:  부산, 서울"));
        Ok(())
    }

    #[test]
    fn test_forecast__prints_projection() -> TestResult {
        let dir = data_dir()?;
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.args(["forecast", "--region", "서울", "--size", "전체", "--dir"])
            .arg(dir.path());

        cmd.assert()
            .success()
            .stdout(contains("2026 projection:          3,960"))
            .stdout(contains("Expected change:          +9.1%"));
        Ok(())
    }

    #[test]
    fn test_forecast__json_has_trend_grid() -> TestResult {
        let dir = data_dir()?;
        let output = Command::cargo_bin(NAME)?
            .args(["forecast", "--region", "서울", "--size", "전체", "--json", "--dir"])
            .arg(dir.path())
            .output()?;
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(report["target_year"], 2026);
        assert_eq!(report["trend"].as_array().map(|a| a.len()), Some(50));
        assert_eq!(report["series"].as_array().map(|a| a.len()), Some(2));
        Ok(())
    }

    #[test]
    fn test_forecast__single_point_shows_history_only() -> TestResult {
        let dir = data_dir()?;
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.args(["forecast", "--region", "부산", "--size", "전체", "--dir"])
            .arg(dir.path());

        cmd.assert()
            .success()
            .stdout(contains("2025-01"))
            .stdout(contains("Forecast could not be computed"));
        Ok(())
    }

    #[test]
    fn test_forecast__unknown_region_fails() -> TestResult {
        let dir = data_dir()?;
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.args(["forecast", "--region", "제주", "--size", "전체", "--dir"])
            .arg(dir.path());

        cmd.assert()
            .failure()
            .stderr(contains("No data for region '제주'"));
        Ok(())
    }

    #[test]
    fn test_load_failure__lists_directory() -> TestResult {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("broken.csv"), "a,b\n1,2\n")?;
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.arg("inspect").arg("--dir").arg(dir.path());

        cmd.assert()
            .failure()
            .stderr(contains("Essential columns not found"))
            .stderr(contains("broken.csv"));
        Ok(())
    }

    #[test]
    fn test_export__writes_normalized_csv() -> TestResult {
        let dir = data_dir()?;
        let out = dir.path().join("normalized.out");
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.arg("export")
            .arg("--out")
            .arg(&out)
            .arg("--dir")
            .arg(dir.path());

        cmd.assert().success().stdout(contains("Wrote 3 records"));
        let written = fs::read_to_string(&out)?;
        assert!(written.starts_with("지역명,규모구분,연도,월,분양가격,날짜,평당가"));
        Ok(())
    }

    #[test]
    fn test_summary__uses_config_target_year() -> TestResult {
        let dir = data_dir()?;
        fs::write(dir.path().join("presale_trend.toml"), "target_year = 2030\n")?;
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.arg("summary").arg("--dir").arg(dir.path());

        cmd.assert()
            .success()
            .stdout(contains("2030"))
            .stdout(contains("no trend"));
        Ok(())
    }

    #[test]
    fn test_forecast__rejects_out_of_range_target_year() -> TestResult {
        let dir = data_dir()?;
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.args(["forecast", "--region", "서울", "--size", "전체", "--target-year", "9999", "--dir"])
            .arg(dir.path());

        cmd.assert()
            .failure()
            .stderr(contains("target_year 9999 outside 1900..=2200"));
        Ok(())
    }

    #[test]
    fn test_summary__target_year_flag_overrides_config() -> TestResult {
        let dir = data_dir()?;
        fs::write(dir.path().join("presale_trend.toml"), "target_year = 2030\n")?;
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.args(["summary", "--target-year", "2027", "--dir"])
            .arg(dir.path());

        cmd.assert().success().stdout(contains("2027"));
        Ok(())
    }
}
