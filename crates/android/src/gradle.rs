//! Gradle Kotlin DSL rendering
//!
//! Turns a [`BuildPlan`] into the `android/app/build.gradle.kts` script a
//! Flutter project expects.

use crate::emitter::{BuildPlan, Directive};
use crate::signing::SigningProfile;

const INDENT: &str = "    ";

/// Sections of the script, filled from directives in plan order
#[derive(Default)]
struct Script {
    android: Vec<String>,
    compile_options: Vec<String>,
    kotlin_options: Vec<String>,
    default_config: Vec<String>,
    signing_configs: Vec<(String, Vec<String>)>,
    build_types: Vec<(String, Vec<String>)>,
    flutter: Vec<String>,
    dependencies: Vec<String>,
}

/// Render the plan as a complete `build.gradle.kts`
pub fn render_gradle_kts(plan: &BuildPlan) -> String {
    let mut script = Script::default();
    for directive in plan {
        script.apply(directive);
    }
    script.render()
}

impl Script {
    fn apply(&mut self, directive: &Directive) {
        match directive {
            Directive::SetNamespace { namespace } => {
                self.android.push(format!("namespace = {}", quote(namespace)));
            }
            Directive::SetCompileSdk { api_level } => {
                self.android.push(format!("compileSdk = {api_level}"));
            }
            Directive::SetNdkVersion { version } => {
                self.android.push(format!("ndkVersion = {}", quote(version)));
            }
            Directive::SetJavaCompatibility { source, target } => {
                self.compile_options.push(format!(
                    "sourceCompatibility = JavaVersion.{}",
                    source.gradle_constant()
                ));
                self.compile_options.push(format!(
                    "targetCompatibility = JavaVersion.{}",
                    target.gradle_constant()
                ));
            }
            Directive::SetJvmTarget { target } => {
                self.kotlin_options.push(format!(
                    "jvmTarget = JavaVersion.{}.toString()",
                    target.gradle_constant()
                ));
            }
            Directive::EnableLibraryDesugaring { artifact } => {
                self.compile_options
                    .insert(0, "isCoreLibraryDesugaringEnabled = true".to_string());
                self.dependencies
                    .push(format!("coreLibraryDesugaring({})", quote(artifact)));
            }
            Directive::SetApplicationId { application_id } => {
                self.default_config
                    .push(format!("applicationId = {}", quote(application_id)));
            }
            Directive::SetMinSdk { api_level } => {
                self.default_config.push(format!("minSdk = {api_level}"));
            }
            Directive::SetTargetSdk { api_level } => {
                self.default_config.push(format!("targetSdk = {api_level}"));
            }
            Directive::SetVersion { code, name } => {
                self.default_config.push(format!("versionCode = {code}"));
                self.default_config
                    .push(format!("versionName = {}", quote(name)));
            }
            Directive::EnableMultiDex => {
                self.default_config.push("multiDexEnabled = true".to_string());
            }
            Directive::BindSigningProfile { profile, variant } => {
                if !profile.is_debug() {
                    self.signing_configs
                        .push((profile.name.clone(), signing_properties(profile)));
                }
                self.build_types.push((
                    variant.clone(),
                    vec![format!(
                        "signingConfig = signingConfigs.getByName({})",
                        quote(&profile.name)
                    )],
                ));
            }
            Directive::SetFlutterSource { path } => {
                self.flutter.push(format!("source = {}", quote(path)));
            }
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("plugins {\n");
        push_lines(
            &mut out,
            1,
            &[
                "id(\"com.android.application\")".to_string(),
                "id(\"kotlin-android\")".to_string(),
                "// The Flutter Gradle Plugin must be applied after the Android and Kotlin Gradle plugins."
                    .to_string(),
                "id(\"dev.flutter.flutter-gradle-plugin\")".to_string(),
            ],
        );
        out.push_str("}\n\nandroid {\n");
        push_lines(&mut out, 1, &self.android);

        push_block(&mut out, 1, "compileOptions", &self.compile_options);
        push_block(&mut out, 1, "kotlinOptions", &self.kotlin_options);
        push_block(&mut out, 1, "defaultConfig", &self.default_config);

        if !self.signing_configs.is_empty() {
            out.push('\n');
            open(&mut out, 1, "signingConfigs");
            for (name, properties) in &self.signing_configs {
                open(&mut out, 2, &format!("create({})", quote(name)));
                push_lines(&mut out, 3, properties);
                close(&mut out, 2);
            }
            close(&mut out, 1);
        }

        if !self.build_types.is_empty() {
            out.push('\n');
            open(&mut out, 1, "buildTypes");
            for (variant, properties) in &self.build_types {
                open(&mut out, 2, variant);
                push_lines(&mut out, 3, properties);
                close(&mut out, 2);
            }
            close(&mut out, 1);
        }
        out.push_str("}\n");

        if !self.flutter.is_empty() {
            out.push('\n');
            open(&mut out, 0, "flutter");
            push_lines(&mut out, 1, &self.flutter);
            close(&mut out, 0);
        }

        if !self.dependencies.is_empty() {
            out.push('\n');
            open(&mut out, 0, "dependencies");
            push_lines(&mut out, 1, &self.dependencies);
            close(&mut out, 0);
        }

        out
    }
}

fn signing_properties(profile: &SigningProfile) -> Vec<String> {
    let mut properties = Vec::new();
    if let Some(store_file) = &profile.store_file {
        properties.push(format!("storeFile = file({})", quote(store_file)));
    }
    if let Some(key_alias) = &profile.key_alias {
        properties.push(format!("keyAlias = {}", quote(key_alias)));
    }
    properties
}

fn push_block(out: &mut String, depth: usize, name: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    out.push('\n');
    open(out, depth, name);
    push_lines(out, depth + 1, lines);
    close(out, depth);
}

fn open(out: &mut String, depth: usize, name: &str) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(name);
    out.push_str(" {\n");
}

fn close(out: &mut String, depth: usize) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str("}\n");
}

fn push_lines(out: &mut String, depth: usize, lines: &[String]) {
    for line in lines {
        out.push_str(&INDENT.repeat(depth));
        out.push_str(line);
        out.push('\n');
    }
}

/// Kotlin string literal; control characters are escaped
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '$' => quoted.push_str("\\$"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04X}", u32::from(c))),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
