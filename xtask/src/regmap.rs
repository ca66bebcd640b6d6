// Licensed under the Apache-2.0 license

//! Merge register descriptions and write one output.

use anyhow::{bail, Result};
use log::info;
use registers_generator::{writer_for, RenderConfig};
use registers_ipxact::{merge_file, Components, MergeConfig};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default)]
pub struct Options {
    pub merge_by_address: bool,
    pub project: Option<String>,
    pub output_type: Option<String>,
}

/// Read `inputs` in order into one model and render it to `output`.
///
/// Returns the files written.
pub fn run(inputs: &[PathBuf], output: &Path, options: &Options) -> Result<Vec<PathBuf>> {
    let merge_config = if options.merge_by_address {
        MergeConfig::by_address()
    } else {
        MergeConfig::by_name()
    };
    let mut render_config = RenderConfig::new();
    if let Some(project) = &options.project {
        render_config = render_config.project(project);
    }
    if let Some(output_type) = &options.output_type {
        render_config = render_config.output_type(output_type);
    }

    let mut components = Components::new();
    for input in inputs {
        info!("Reading {}", input.display());
        if !merge_file(input, &mut components, &merge_config)? {
            bail!("Reader failed to read file {}", input.display());
        }
    }

    info!("Writing {}", output.display());
    let written = writer_for(output, &render_config)?.write(&components)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"<ipxact:component xmlns:ipxact="http://www.accellera.org/XMLSchema/IPXACT/1685-2014">
  <ipxact:memoryMaps><ipxact:memoryMap>
    <ipxact:addressBlock>
      <ipxact:name>timer</ipxact:name>
      <ipxact:baseAddress>0x1000</ipxact:baseAddress>
      <ipxact:register>
        <ipxact:name>foo</ipxact:name>
        <ipxact:addressOffset>0x10</ipxact:addressOffset>
        <ipxact:size>32</ipxact:size>
        <ipxact:field>
          <ipxact:name>A</ipxact:name>
          <ipxact:bitOffset>0</ipxact:bitOffset>
          <ipxact:bitWidth>8</ipxact:bitWidth>
          <ipxact:access>read-write</ipxact:access>
        </ipxact:field>
      </ipxact:register>
    </ipxact:addressBlock>
  </ipxact:memoryMap></ipxact:memoryMaps>
</ipxact:component>
"#;

    const OVERLAY: &str = r#"<ipxact:component xmlns:ipxact="http://www.accellera.org/XMLSchema/IPXACT/1685-2014">
  <ipxact:memoryMaps><ipxact:memoryMap>
    <ipxact:addressBlock>
      <ipxact:name>timer</ipxact:name>
      <ipxact:register>
        <ipxact:name>bar</ipxact:name>
        <ipxact:addressOffset>0x10</ipxact:addressOffset>
        <ipxact:size>32</ipxact:size>
        <ipxact:field>
          <ipxact:name>B</ipxact:name>
          <ipxact:bitOffset>8</ipxact:bitOffset>
          <ipxact:bitWidth>8</ipxact:bitWidth>
          <ipxact:access>read-only</ipxact:access>
        </ipxact:field>
      </ipxact:register>
    </ipxact:addressBlock>
  </ipxact:memoryMap></ipxact:memoryMaps>
</ipxact:component>
"#;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_merge_by_address_into_header() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            write(dir.path(), "base.xml", BASE),
            write(dir.path(), "overlay.xml", OVERLAY),
        ];
        let options = Options {
            merge_by_address: true,
            project: Some("demo".to_string()),
            ..Default::default()
        };
        let written = run(&inputs, &dir.path().join("regs.h"), &options).unwrap();
        assert_eq!(written, vec![dir.path().join("regs_timer.h")]);

        let header = std::fs::read_to_string(&written[0]).unwrap();
        assert!(header.contains("@project    demo"));
        assert!(header.contains("#define REG_TIMER_BAR "));
        assert!(header.contains("TIMER_BAR_B_SHIFT 8u"));
        assert!(!header.contains("REG_TIMER_FOO"));
        assert!(!header.contains("TIMER_BAR_A_"));
        assert!(header.contains("reserved_0[4];"));
    }

    #[test]
    fn test_merge_by_name_keeps_both() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            write(dir.path(), "base.xml", BASE),
            write(dir.path(), "overlay.xml", OVERLAY),
        ];
        let options = Options {
            output_type: Some("asym".to_string()),
            ..Default::default()
        };
        let output = dir.path().join("regs.inc");
        run(&inputs, &output, &options).unwrap();

        let symbols = std::fs::read_to_string(&output).unwrap();
        assert!(symbols.contains(".equ    REG_TIMER_FOO, 0x1010"));
        assert!(symbols.contains(".equ    REG_TIMER_BAR, 0x1010"));
    }

    #[test]
    fn test_failures() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(
            dir.path(),
            "bad.xml",
            &BASE.replace("<ipxact:size>32</ipxact:size>", "<ipxact:size>big</ipxact:size>"),
        );
        let err = run(&[bad], &dir.path().join("regs.h"), &Options::default()).unwrap_err();
        assert!(err.to_string().contains("Reader failed to read file"));

        let good = write(dir.path(), "base.xml", BASE);
        let missing = dir.path().join("missing.xml");
        assert!(run(&[missing], &dir.path().join("regs.h"), &Options::default()).is_err());
        assert!(run(&[good.clone()], &dir.path().join("regs.tex"), &Options::default()).is_err());
        assert!(run(&[good], &dir.path().join("regs.json"), &Options::default()).is_err());
    }
}
