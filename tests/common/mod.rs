use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Emits one file of every required category into `dist/`.
pub const EMIT_COMPLETE: &str = "mkdir -p dist/fonts \
    && echo '<!doctype html>' > dist/index.html \
    && echo 'console.log(1)' > dist/app.5e1f.js \
    && echo 'body{}' > dist/app.77aa.css \
    && echo 'ttf' > dist/fonts/MaterialIcons-Regular.ttf";

/// Emits everything except a stylesheet.
pub const EMIT_NO_CSS: &str = "mkdir -p dist/fonts \
    && touch dist/index.html dist/app.js dist/fonts/MaterialIcons-Regular.ttf";

/// A WebUI project directory next to its deployment target.
pub struct Project {
    _tmp: TempDir,
    pub webui: PathBuf,
    pub webroot: PathBuf,
}

impl Project {
    pub fn new(build_script: &str) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let webui = tmp.path().join("webui");
        let webroot = tmp.path().join("module/webroot");
        fs::create_dir_all(&webui).expect("create webui dir");
        fs::create_dir_all(&webroot).expect("create webroot");
        fs::write(webroot.join(".gitkeep"), "").expect("write .gitkeep");

        write_config(&webui, build_script);
        Self {
            _tmp: tmp,
            webui,
            webroot,
        }
    }
}

pub fn write_config(webui: &Path, build_script: &str) {
    let config = format!(
        "target_dir = \"../module/webroot\"\n\n[bundler]\ninstall = [\"sh\", \"-c\", \"touch .installed\"]\nbuild = [\"sh\", \"-c\", {}]\n",
        toml_string(build_script)
    );
    fs::write(webui.join("webui-build.toml"), config).expect("write config");
}

fn toml_string(raw: &str) -> String {
    format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
}
