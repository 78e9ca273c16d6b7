//! End-to-end pruning of a generated NestJS project on the local filesystem.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use apiprune_adapters::{LocalFilesystem, MemoryFilesystem, default_chain};
use apiprune_core::{
    application::{PruneReport, PruneService},
    domain::{ApiMode, ConfigEdits, ProjectLayout},
    error::PruneResult,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use walkdir::WalkDir;

const MANIFEST: &str = r#"{
  "version": "1.0.0",
  "modes": {
    "graphql": {
      "filePatterns": ["src/**/*.resolver.ts", "src/graphql"],
      "packages": ["@nestjs/graphql", "graphql"],
      "devPackages": ["@graphql-codegen/cli"],
      "scripts": ["codegen"],
      "scriptEdits": { "build": { "remove": " && npm run codegen" } },
      "regionMarker": "graphql"
    },
    "rest": {
      "filePatterns": ["src/**/*.controller.ts"],
      "packages": ["@nestjs/swagger"],
      "scripts": ["openapi"],
      "scriptEdits": { "build": { "remove": " && npm run openapi" } },
      "regionMarker": "rest"
    }
  }
}
"#;

const PACKAGE: &str = r#"{
  "name": "server",
  "scripts": {
    "build": "nest build && npm run codegen",
    "codegen": "graphql-codegen",
    "openapi": "ts-node scripts/openapi.ts",
    "strip-markers": "node scripts/strip-markers.mjs"
  },
  "dependencies": {
    "@nestjs/common": "^10.0.0",
    "@nestjs/graphql": "^12.0.0",
    "@nestjs/swagger": "^7.0.0",
    "graphql": "^16.8.0"
  },
  "devDependencies": {
    "@graphql-codegen/cli": "^5.0.0",
    "typescript": "^5.4.0"
  }
}
"#;

const APP_MODULE: &str = "\
import { Module } from '@nestjs/common';
import { GraphQLModule } from '@nestjs/graphql';
import { ApolloDriver, ApolloDriverConfig } from '@nestjs/apollo';
import { UsersController } from './users/users.controller';
import { UsersResolver } from './users/users.resolver';
import { UsersService } from './users/users.service';

@Module({
  imports: [
    // #region graphql
    GraphQLModule.forRoot<ApolloDriverConfig>({ driver: ApolloDriver }),
    // #endregion graphql
  ],
  // #region rest
  controllers: [UsersController],
  // #endregion rest
  providers: [
    UsersService,
    // #region graphql
    UsersResolver,
    // #endregion graphql
  ],
})
export class AppModule {}
";

const USER_SCHEMA: &str = "\
import { Prop, Schema as MongooseSchema, SchemaFactory } from '@nestjs/mongoose';
import { Field, ObjectType } from '@nestjs/graphql';

// #region graphql
@ObjectType()
// #endregion graphql
@MongooseSchema()
export class User {
  // #region graphql
  @Field()
  // #endregion graphql
  @Prop()
  name: string;
}



export const UserSchema = SchemaFactory.createForClass(User);
";

const E2E_SPEC: &str = "\
import { gql } from 'graphql-tag';
import request from 'supertest';

describe('users', () => {
  // #region graphql
  it('queries users', () => gql`{ users { id } }`);
  // #endregion graphql
  // #region rest
  it('lists users', () => request(app).get('/users'));
  // #endregion rest
});
";

const CONFIG_MODULE: &str = "\
import { merge } from 'lodash';

const base = {
  port: Number(process.env.PORT ?? 3000),
};

const config = merge(base, {
  local: {
    graphQl: {
      playground: true,
      introspection: true,
    },
    execAfterInit: async () => {
      await seed();
    },
  },
  production: {
    graphQl: { playground: false },
  },
});

export default config;
";

// ============================================================================
// Fixtures
// ============================================================================

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "api-mode.manifest.json", MANIFEST);
    write(root, "package.json", PACKAGE);
    write(root, "scripts/strip-markers.mjs", "// strips markers\n");
    write(root, "src/app.module.ts", APP_MODULE);
    write(root, "src/config.env.ts", CONFIG_MODULE);
    write(root, "src/users/user.schema.ts", USER_SCHEMA);
    write(root, "src/users/users.controller.ts", "export class UsersController {}\n");
    write(root, "src/users/users.resolver.ts", "export class UsersResolver {}\n");
    write(root, "src/users/users.service.ts", "export class UsersService {}\n");
    write(root, "src/graphql/scalars.ts", "export const scalars = [];\n");
    write(root, "tests/users.e2e-spec.ts", E2E_SPEC);
    dir
}

fn service() -> PruneService {
    PruneService::new(
        Box::new(LocalFilesystem::new()),
        default_chain(),
        ProjectLayout::default(),
        ConfigEdits::default(),
    )
}

fn prune(root: &Path, mode: ApiMode) -> PruneResult<PruneReport> {
    service().process_api_mode(root, mode)
}

/// Every file under `root` with its content, keyed by relative path.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap().to_path_buf();
            (relative, fs::read_to_string(e.path()).unwrap())
        })
        .collect()
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

fn package(root: &Path) -> Value {
    serde_json::from_str(&read(root, "package.json")).unwrap()
}

// ============================================================================
// No manifest
// ============================================================================

#[test]
fn project_without_manifest_is_left_alone() {
    let dir = project();
    fs::remove_file(dir.path().join("api-mode.manifest.json")).unwrap();
    let before = snapshot(dir.path());

    let report = prune(dir.path(), ApiMode::Rest).unwrap();

    assert!(!report.manifest_found);
    assert!(report.is_noop());
    assert_eq!(snapshot(dir.path()), before);
}

// ============================================================================
// REST
// ============================================================================

#[test]
fn rest_removes_graphql_variant() {
    let dir = project();
    let root = dir.path();

    let report = prune(root, ApiMode::Rest).unwrap();
    assert!(report.manifest_found);
    assert_eq!(report.config_strategy.as_deref(), Some("structural"));

    assert!(!root.join("src/users/users.resolver.ts").exists());
    assert!(!root.join("src/graphql").exists());
    assert!(root.join("src/users/users.controller.ts").exists());
    assert!(report.removed_paths.contains(&PathBuf::from("src/graphql")));

    assert_eq!(
        read(root, "src/app.module.ts"),
        "\
import { Module } from '@nestjs/common';
import { UsersController } from './users/users.controller';
import { UsersService } from './users/users.service';

@Module({
  imports: [
  ],
  controllers: [UsersController],
  providers: [
    UsersService,
  ],
})
export class AppModule {}
"
    );
}

#[test]
fn rest_keeps_aliased_imports_that_are_still_used() {
    let dir = project();
    prune(dir.path(), ApiMode::Rest).unwrap();

    assert_eq!(
        read(dir.path(), "src/users/user.schema.ts"),
        "\
import { Prop, Schema as MongooseSchema, SchemaFactory } from '@nestjs/mongoose';

@MongooseSchema()
export class User {
  @Prop()
  name: string;
}

export const UserSchema = SchemaFactory.createForClass(User);
"
    );
}

#[test]
fn test_files_lose_regions_but_keep_imports() {
    let dir = project();
    prune(dir.path(), ApiMode::Rest).unwrap();

    assert_eq!(
        read(dir.path(), "tests/users.e2e-spec.ts"),
        "\
import { gql } from 'graphql-tag';
import request from 'supertest';

describe('users', () => {
  it('lists users', () => request(app).get('/users'));
});
"
    );
}

#[test]
fn rest_prunes_package_descriptor() {
    let dir = project();
    prune(dir.path(), ApiMode::Rest).unwrap();

    assert_eq!(
        package(dir.path()),
        json!({
            "name": "server",
            "scripts": {
                "build": "nest build",
                "openapi": "ts-node scripts/openapi.ts"
            },
            "dependencies": {
                "@nestjs/common": "^10.0.0",
                "@nestjs/swagger": "^7.0.0"
            },
            "devDependencies": {
                "typescript": "^5.4.0"
            }
        })
    );

    let raw = read(dir.path(), "package.json");
    assert!(raw.starts_with("{\n  \"name\": \"server\",\n  \"scripts\": {\n    \"build\""));
    assert!(raw.ends_with("}\n"));
}

#[test]
fn rest_rewrites_config_module() {
    let dir = project();
    prune(dir.path(), ApiMode::Rest).unwrap();

    assert_eq!(
        read(dir.path(), "src/config.env.ts"),
        "\
import { merge } from 'lodash';

const base = {
  port: Number(process.env.PORT ?? 3000),
};

const config = merge(base, {
  local: {
    graphQl: false,
  },
  production: {
    graphQl: false,
  },
});

export default config;
"
    );
}

#[test]
fn textual_strategy_takes_over_when_config_is_not_bound() {
    let dir = project();
    write(
        dir.path(),
        "src/config.env.ts",
        "export default {\n  local: {\n    graphQl: { playground: true },\n    execAfterInit: seed,\n  },\n};\n",
    );

    let report = prune(dir.path(), ApiMode::Rest).unwrap();

    assert_eq!(report.config_strategy.as_deref(), Some("textual"));
    assert_eq!(
        read(dir.path(), "src/config.env.ts"),
        "export default {\n  local: {\n    graphQl: false,\n  },\n};\n"
    );
}

// ============================================================================
// GraphQL and Both
// ============================================================================

#[test]
fn graphql_removes_rest_variant_and_leaves_config() {
    let dir = project();
    let root = dir.path();

    let report = prune(root, ApiMode::GraphQl).unwrap();
    assert_eq!(report.config_strategy, None);

    assert!(!root.join("src/users/users.controller.ts").exists());
    assert!(root.join("src/users/users.resolver.ts").exists());
    assert!(root.join("src/graphql/scalars.ts").exists());
    assert_eq!(read(root, "src/config.env.ts"), CONFIG_MODULE);

    assert_eq!(
        read(root, "src/app.module.ts"),
        "\
import { Module } from '@nestjs/common';
import { GraphQLModule } from '@nestjs/graphql';
import { ApolloDriver, ApolloDriverConfig } from '@nestjs/apollo';
import { UsersResolver } from './users/users.resolver';
import { UsersService } from './users/users.service';

@Module({
  imports: [
    GraphQLModule.forRoot<ApolloDriverConfig>({ driver: ApolloDriver }),
  ],
  providers: [
    UsersService,
    UsersResolver,
  ],
})
export class AppModule {}
"
    );

    let package = package(root);
    assert_eq!(package["scripts"]["build"], "nest build && npm run codegen");
    assert!(package["scripts"].get("openapi").is_none());
    assert!(package["dependencies"].get("@nestjs/swagger").is_none());
    assert!(package["dependencies"].get("graphql").is_some());
}

#[test]
fn both_only_strips_markers() {
    let dir = project();
    let root = dir.path();

    prune(root, ApiMode::Both).unwrap();

    for path in [
        "src/users/users.controller.ts",
        "src/users/users.resolver.ts",
        "src/graphql/scalars.ts",
    ] {
        assert!(root.join(path).exists(), "{path}");
    }
    assert_eq!(read(root, "src/config.env.ts"), CONFIG_MODULE);

    for (path, content) in snapshot(root) {
        assert!(!content.contains("#region"), "{}", path.display());
        assert!(!content.contains("#endregion"), "{}", path.display());
    }

    let module = read(root, "src/app.module.ts");
    assert!(module.contains("import { ApolloDriver, ApolloDriverConfig } from '@nestjs/apollo';"));
    assert!(module.contains("  controllers: [UsersController],\n"));
    assert!(module.contains("    UsersResolver,\n"));

    let schema = read(root, "src/users/user.schema.ts");
    assert!(!schema.contains("\n\n\n"));

    let package = package(root);
    assert!(package["scripts"].get("strip-markers").is_none());
    assert!(package["scripts"].get("codegen").is_some());
    assert!(package["dependencies"].get("@nestjs/graphql").is_some());
}

// ============================================================================
// Cleanup and idempotence
// ============================================================================

#[test]
fn every_mode_removes_manifest_and_control_script() {
    for mode in [ApiMode::Rest, ApiMode::GraphQl, ApiMode::Both] {
        let dir = project();
        let root = dir.path();

        let report = prune(root, mode).unwrap();

        assert!(!root.join("api-mode.manifest.json").exists(), "{mode}");
        assert!(!root.join("scripts/strip-markers.mjs").exists(), "{mode}");
        assert!(package(root)["scripts"].get("strip-markers").is_none(), "{mode}");
        assert!(report.removed_scripts.contains(&"strip-markers".to_string()));
    }
}

#[test]
fn cleanup_tolerates_missing_package_and_control_script() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "api-mode.manifest.json", MANIFEST);
    write(root, "src/app.module.ts", APP_MODULE);

    let report = prune(root, ApiMode::Rest).unwrap();

    assert!(!root.join("api-mode.manifest.json").exists());
    assert!(!root.join("package.json").exists());
    assert_eq!(report.removed_paths, vec![PathBuf::from("api-mode.manifest.json")]);
}

#[test]
fn second_run_changes_nothing() {
    for mode in [ApiMode::Rest, ApiMode::GraphQl, ApiMode::Both] {
        let dir = project();
        prune(dir.path(), mode).unwrap();
        let after_first = snapshot(dir.path());

        let report = prune(dir.path(), mode).unwrap();

        assert!(!report.manifest_found, "{mode}");
        assert_eq!(snapshot(dir.path()), after_first, "{mode}");
    }
}

#[test]
fn crossing_markers_abort_before_any_change() {
    let dir = project();
    write(
        dir.path(),
        "src/broken.ts",
        "// #region graphql\n// #region rest\n// #endregion graphql\n// #endregion rest\n",
    );
    let before = snapshot(dir.path());

    let err = prune(dir.path(), ApiMode::Rest).unwrap_err();

    assert!(err.to_string().contains("broken.ts"));
    assert_eq!(snapshot(dir.path()), before);
}

// ============================================================================
// In-memory filesystem
// ============================================================================

#[test]
fn memory_filesystem_prunes_like_disk() {
    let fs = MemoryFilesystem::new()
        .with_file("/p/api-mode.manifest.json", MANIFEST)
        .with_file("/p/package.json", PACKAGE)
        .with_file("/p/src/app.module.ts", APP_MODULE)
        .with_file("/p/src/users/users.resolver.ts", "export class UsersResolver {}\n")
        .with_file("/p/src/users/users.controller.ts", "export class UsersController {}\n");
    let service = PruneService::new(
        Box::new(fs.clone()),
        default_chain(),
        ProjectLayout::default(),
        ConfigEdits::default(),
    );

    service.process_api_mode("/p", ApiMode::Rest).unwrap();

    assert_eq!(
        fs.paths(),
        vec![
            PathBuf::from("/p/package.json"),
            PathBuf::from("/p/src/app.module.ts"),
            PathBuf::from("/p/src/users/users.controller.ts"),
        ]
    );
    let module = fs.read_file(Path::new("/p/src/app.module.ts")).unwrap();
    assert!(!module.contains("UsersResolver"));

    let writes = fs.write_count();
    service.process_api_mode("/p", ApiMode::Rest).unwrap();
    assert_eq!(fs.write_count(), writes);
}
