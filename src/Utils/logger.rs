use csv::Writer;
use nalgebra::DVector;
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode};
use std::fs::File;
use std::io::{self, Write as IoWrite};

/// Initializes the terminal logger according to the solver loglevel setting.
///
/// "off"/"none" disables logging entirely; a second initialization in the
/// same process is ignored, so every solver can call this unconditionally.
pub fn init_term_logger(loglevel: &Option<String>) {
    let is_logging_disabled = loglevel
        .as_ref()
        .map(|level| level == "off" || level == "none")
        .unwrap_or(false);
    if is_logging_disabled {
        return;
    }
    let log_option = match loglevel.as_deref() {
        Some("debug") | Some("info") | None => LevelFilter::Info,
        Some("warn") => LevelFilter::Warn,
        Some("error") => LevelFilter::Error,
        Some(level) => panic!("loglevel must be debug, info, warn or error, got {}", level),
    };
    let _ = CombinedLogger::init(vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

/// Writes a table of columns to a tab-separated text file, the argument
/// column first.
pub fn save_columns_to_file(
    filename: &str,
    arg: &str,
    headers: &[String],
    x_mesh: &DVector<f64>,
    columns: &[DVector<f64>],
) -> io::Result<()> {
    assert_eq!(headers.len(), columns.len(), "every column needs a header");
    let mut file = File::create(filename)?;
    let mut headers_with_x = vec![arg.to_string()];
    headers_with_x.extend(headers.iter().cloned());
    writeln!(file, "{}", headers_with_x.join("\t"))?;
    for i in 0..x_mesh.len() {
        let mut row_data = vec![x_mesh[i].to_string()];
        row_data.extend(columns.iter().map(|col| col[i].to_string()));
        writeln!(file, "{}", row_data.join("\t"))?;
    }
    Ok(())
}

/// Writes a table of columns to a csv file, the argument column first.
pub fn save_columns_to_csv(
    filename: &str,
    arg: &str,
    headers: &[String],
    x_mesh: &DVector<f64>,
    columns: &[DVector<f64>],
) -> io::Result<()> {
    assert_eq!(headers.len(), columns.len(), "every column needs a header");
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);

    let mut headers_with_x = vec![arg.to_string()];
    headers_with_x.extend(headers.iter().cloned());
    writer.write_record(&headers_with_x)?;

    for i in 0..x_mesh.len() {
        let mut row_data = vec![x_mesh[i].to_string()];
        row_data.extend(columns.iter().map(|col| col[i].to_string()));
        writer.write_record(&row_data)?;
    }

    writer.flush()?;
    Ok(())
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                     TESTS
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_save_columns_to_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.csv");
        let filename = path.to_str().unwrap();
        let t = DVector::from_vec(vec![0.0, 0.5, 1.0]);
        let y = DVector::from_vec(vec![1.0, 2.0, 4.0]);
        save_columns_to_csv(filename, "t", &["y".to_string()], &t, &[y]).unwrap();
        let contents = fs::read_to_string(filename).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), "t,y");
        assert_eq!(lines.next().unwrap(), "0,1");
        assert_eq!(lines.next().unwrap(), "0.5,2");
    }

    #[test]
    fn test_save_columns_to_file_writes_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.txt");
        let filename = path.to_str().unwrap();
        let t = DVector::from_vec(vec![0.0, 1.0]);
        let y = DVector::from_vec(vec![3.0, 5.0]);
        save_columns_to_file(filename, "t", &["y".to_string()], &t, &[y]).unwrap();
        let contents = fs::read_to_string(filename).unwrap();
        assert!(contents.starts_with("t\ty"));
        assert!(contents.contains("1\t5"));
    }
}
