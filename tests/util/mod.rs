use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Captures tracing output for tests.
#[allow(dead_code)]
pub struct TestTracing {
    buffer: std::sync::Arc<std::sync::Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl TestTracing {
    pub fn new() -> Self {
        Self {
            buffer: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.buffer.clone();
        let make_writer = move || TestWriter(writer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn output(&self) -> String {
        let buf = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Assert that the captured log output contains the provided substring.
    pub fn assert_contains(&self, needle: &str) {
        let out = self.output();
        assert!(
            out.contains(needle),
            "expected logs to contain `{needle}`, got:\n{out}"
        );
    }
}

#[allow(dead_code)]
struct TestWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.0.lock().unwrap();
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[allow(dead_code)]
pub const DEMOGRAPHIC_HEADER: &str =
    ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year";
#[allow(dead_code)]
pub const WASHINGTON_HEADER: &str =
    ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type";

/// Ten Chicago trips: six on Mondays, four on Tuesdays; six in March, three
/// in January, one in June. Trip `i` lasts `100 * i` seconds.
#[allow(dead_code)]
pub fn chicago_rows() -> Vec<String> {
    let trips = [
        ("2017-01-02 08:00:00", "Clark St & Lake St", "Wells St & Elm St", "Subscriber", "Male", "1980.0"),
        ("2017-03-06 08:15:00", "Canal St & Adams St", "Clark St & Lake St", "Subscriber", "Female", "1990.0"),
        ("2017-03-06 17:00:00", "Clark St & Lake St", "Canal St & Adams St", "Customer", "", ""),
        ("2017-01-02 17:30:00", "Canal St & Adams St", "Wells St & Elm St", "Subscriber", "Male", "1975.0"),
        ("2017-03-06 09:00:00", "Clark St & Lake St", "Wells St & Elm St", "Subscriber", "Male", "1980.0"),
        ("2017-03-06 08:45:00", "Canal St & Adams St", "Wells St & Elm St", "Subscriber", "Female", "1962.0"),
        ("2017-03-07 08:10:00", "Clark St & Lake St", "Wells St & Elm St", "Customer", "Female", "1990.0"),
        ("2017-03-07 18:00:00", "Canal St & Adams St", "Clark St & Lake St", "Subscriber", "Male", "2000.0"),
        ("2017-01-03 07:00:00", "Wells St & Elm St", "Clark St & Lake St", "Subscriber", "Male", "1980.0"),
        ("2017-06-06 12:00:00", "Canal St & Adams St", "Canal St & Adams St", "Subscriber", "Male", "1985.0"),
    ];
    trips
        .iter()
        .enumerate()
        .map(|(i, (start, from, to, user, gender, year))| {
            let duration = 100 * (i + 1);
            format!("{i},{start},{start},{duration},{from},{to},{user},{gender},{year}")
        })
        .collect()
}

/// Three Washington trips; no Gender or Birth Year columns.
#[allow(dead_code)]
pub fn washington_rows() -> Vec<String> {
    vec![
        "0,2017-04-02 10:00:00,2017-04-02 10:20:00,1200.5,Lincoln Memorial,Jefferson Memorial,Customer".into(),
        "1,2017-04-03 07:30:00,2017-04-03 07:45:00,900.0,14th & V St NW,Lincoln Memorial,Subscriber".into(),
        "2,2017-04-03 07:50:00,2017-04-03 08:05:00,880.25,14th & V St NW,Jefferson Memorial,Subscriber".into(),
    ]
}

/// Temporary data directory populated with city CSV files.
#[allow(dead_code)]
pub struct TempFixtureDir {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TempFixtureDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    /// Directory with the default Chicago and Washington fixtures.
    pub fn with_default_cities() -> Self {
        let fixture = Self::new();
        fixture.write_csv("chicago.csv", DEMOGRAPHIC_HEADER, &chicago_rows());
        fixture.write_csv("washington.csv", WASHINGTON_HEADER, &washington_rows());
        fixture
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn write_csv(&self, file_name: &str, header: &str, rows: &[String]) -> PathBuf {
        write_csv(self.dir.path(), file_name, header, rows)
    }
}

#[allow(dead_code)]
pub fn write_csv(dir: &Path, file_name: &str, header: &str, rows: &[String]) -> PathBuf {
    let mut content = String::from(header);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    let path = dir.join(file_name);
    std::fs::write(&path, content).expect("write fixture csv");
    path
}
