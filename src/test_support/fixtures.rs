//! Canned tool output used across unit tests.

/// `swift package dump-package` for a package with two library products,
/// one executable product, and iOS/macOS deployment targets.
pub const TWO_PRODUCTS_JSON: &str = r#"{
  "name": "FixturePackage",
  "platforms": [
    { "platformName": "ios", "version": "13.0", "options": [] },
    { "platformName": "macos", "version": "10.15", "options": [] }
  ],
  "products": [
    { "name": "FixtureLibrary2", "targets": ["FixtureTarget2", "Shared"], "type": { "library": ["automatic"] }, "settings": [] },
    { "name": "FixtureLibrary1", "targets": ["FixtureTarget1"], "type": { "library": ["automatic"] }, "settings": [] },
    { "name": "fixture-tool", "targets": ["Tool"], "type": { "executable": null }, "settings": [] }
  ],
  "targets": [
    { "name": "FixtureTarget1", "type": "regular", "dependencies": [ { "byName": ["Shared", null] } ] },
    { "name": "FixtureTarget2", "type": "regular", "dependencies": [] },
    { "name": "Shared", "type": "regular", "dependencies": [] },
    { "name": "Tool", "type": "executable", "dependencies": [ { "target": ["Shared", null] } ] },
    { "name": "FixtureTests", "type": "test", "dependencies": [] }
  ],
  "dependencies": [],
  "toolsVersion": { "_version": "5.9.0" }
}"#;

/// A package that breaks every validation rule.
pub const INVALID_PACKAGE_JSON: &str = r#"{
  "name": "BrokenPackage",
  "platforms": [],
  "products": [
    { "name": "broken-tool", "targets": ["Conditional"], "type": { "executable": null } }
  ],
  "targets": [
    { "name": "BinaryTarget", "type": "binary", "url": "https://example.com/b.zip", "checksum": "abc" },
    { "name": "CZlib", "type": "system", "dependencies": [] },
    {
      "name": "Conditional",
      "type": "regular",
      "dependencies": [
        { "product": ["Logging", "swift-log", null, { "platformNames": ["linux"] }] }
      ]
    }
  ]
}"#;

/// `xcrun dwarfdump --uuid` for a fat binary with two slices.
pub const DWARFDUMP_TWO_SLICES: &str = "\
UUID: AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE (x86_64) /build/Foo.framework.dSYM/Contents/Resources/DWARF/Foo
UUID: 0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9 (arm64) /build/Foo.framework.dSYM/Contents/Resources/DWARF/Foo
";
