mod common;

use std::path::PathBuf;

use common::{BOOTSTRAP_APP_CONSOLE, EXAMPLE_TEST, Scaffold};
use slim_scaffold::{
    Error, Event, EventLog, Hook, NoopHooks, Outcome, Pipeline, ProjectRoot, ScaffoldHooks, Stub,
    Variant, plan_for,
};

/// Stands in for `php artisan install:api`: records hook order and creates the api routes file.
#[derive(Default)]
struct FakeInstaller {
    ran: Vec<Hook>,
    fail_on: Option<Hook>,
}

impl ScaffoldHooks for FakeInstaller {
    fn run(&mut self, hook: Hook, root: &ProjectRoot) -> slim_scaffold::Result<()> {
        if self.fail_on == Some(hook) {
            return Err(Error::Hook {
                hook: hook.name(),
                message: "exit status: 1".to_string(),
            });
        }
        self.ran.push(hook);
        if hook == Hook::InstallApi {
            std::fs::write(root.path().join("routes/api.php"), "<?php\n\n// api\n")
                .expect("write api routes");
        }
        Ok(())
    }
}

fn run(
    scaffold: &Scaffold,
    variant: Variant,
    hooks: &mut dyn ScaffoldHooks,
) -> (Outcome, EventLog) {
    let root = scaffold.root();
    let plan = plan_for(variant);
    let mut log = EventLog::new();
    let outcome = Pipeline::new(&root, &plan).run(hooks, &mut log).expect("pipeline");
    (outcome, log)
}

#[test]
fn console_conversion_strips_web_stack() {
    let scaffold = Scaffold::pristine();
    let (outcome, log) = run(&scaffold, Variant::Console, &mut NoopHooks);

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(outcome.exit_code(), 0);
    for gone in [
        "app/Http",
        "app/Models",
        "database",
        "public",
        "resources",
        "node_modules",
        "config/auth.php",
        "config/database.php",
        "config/mail.php",
        "config/queue.php",
        "config/session.php",
        "routes/web.php",
        "package.json",
        "vite.config.js",
    ] {
        assert!(!scaffold.exists(gone), "{gone} should be deleted");
    }
    for kept in [
        "app/Providers/AppServiceProvider.php",
        "config/app.php",
        "routes/console.php",
        "artisan",
    ] {
        assert!(scaffold.exists(kept), "{kept} should be kept");
    }

    assert_eq!(scaffold.read("bootstrap/app.php"), BOOTSTRAP_APP_CONSOLE);
    let test = scaffold.read("tests/Feature/ExampleTest.php");
    assert!(test.contains("$this->artisan('inspire');"));
    assert!(test.contains("$response->assertOk();"));
    assert!(!test.contains("get('/')"));

    assert_eq!(log.deleted().len(), 14);
    assert!(
        !log.events()
            .iter()
            .any(|event| matches!(event, Event::HookRan { .. }))
    );
}

#[test]
fn second_run_is_rejected_without_changes() {
    let scaffold = Scaffold::pristine();
    let (first, _) = run(&scaffold, Variant::Console, &mut NoopHooks);
    assert_eq!(first, Outcome::Completed);

    let before = scaffold.snapshot();
    let (second, log) = run(&scaffold, Variant::Console, &mut NoopHooks);
    assert_eq!(second, Outcome::Rejected);
    assert_eq!(second.exit_code(), 1);
    assert!(log.events().is_empty());
    assert_eq!(scaffold.snapshot(), before);
}

#[test]
fn rejected_project_is_left_untouched() {
    for variant in [Variant::Api, Variant::Console] {
        let scaffold = Scaffold::pristine();
        scaffold.write("config/jetstream.php", "<?php\n\nreturn [];\n");
        let before = scaffold.snapshot();

        let mut hooks = FakeInstaller::default();
        let (outcome, log) = run(&scaffold, variant, &mut hooks);

        assert_eq!(outcome, Outcome::Rejected, "{variant}");
        assert!(hooks.ran.is_empty(), "{variant}: hooks ran on rejection");
        assert!(log.events().is_empty());
        assert_eq!(scaffold.snapshot(), before, "{variant}: project changed");
    }
}

#[test]
fn missing_web_routes_rejects_console_conversion() {
    let scaffold = Scaffold::pristine();
    scaffold.remove("routes/web.php");
    let before = scaffold.snapshot();

    let (outcome, log) = run(&scaffold, Variant::Console, &mut NoopHooks);

    assert_eq!(outcome, Outcome::Rejected);
    assert_eq!(outcome.exit_code(), 1);
    assert!(scaffold.exists("public"));
    assert!(scaffold.exists("resources"));
    assert!(log.events().is_empty());
    assert_eq!(scaffold.snapshot(), before);
}

#[test]
fn database_file_is_rejected_before_any_deletion() {
    let scaffold = Scaffold::pristine();
    scaffold.remove("database");
    scaffold.write("database", "not a directory\n");
    let before = scaffold.snapshot();

    let (outcome, log) = run(&scaffold, Variant::Console, &mut NoopHooks);

    assert_eq!(outcome, Outcome::Rejected);
    assert!(scaffold.exists("app/Http"));
    assert!(scaffold.exists("app/Models"));
    assert!(log.deleted().is_empty());
    assert_eq!(scaffold.snapshot(), before);
}

#[cfg(unix)]
#[test]
fn dangling_auth_routes_symlink_is_not_followed() {
    let scaffold = Scaffold::pristine();
    let outside = tempfile::tempdir().expect("tempdir");
    let escaped = outside.path().join("auth.php");
    std::os::unix::fs::symlink(&escaped, scaffold.join("routes/auth.php")).expect("symlink");

    let root = scaffold.root();
    let plan = plan_for(Variant::Api);
    let err = Pipeline::new(&root, &plan)
        .run(&mut FakeInstaller::default(), &mut EventLog::new())
        .expect_err("symlinked target");

    assert_eq!(err.code(), "invalid_path");
    assert!(!escaped.exists(), "wrote outside the project");
}

#[test]
fn api_conversion_installs_and_wires_auth_routes() {
    let scaffold = Scaffold::pristine();
    let mut hooks = FakeInstaller::default();
    let (outcome, log) = run(&scaffold, Variant::Api, &mut hooks);

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(hooks.ran, vec![Hook::InstallApi, Hook::Migrate]);

    for gone in [
        "resources",
        "node_modules",
        "routes/web.php",
        "package.json",
        "vite.config.js",
    ] {
        assert!(!scaffold.exists(gone), "{gone} should be deleted");
    }
    assert!(scaffold.exists("public/index.php"));
    assert!(scaffold.exists("database"));

    let api = scaffold.read("routes/api.php");
    assert!(api.ends_with("\nrequire __DIR__.'/auth.php';\n"), "{api}");
    assert_eq!(scaffold.read("routes/auth.php"), Stub::AuthRoutes.contents());

    let user = scaffold.read("app/Models/User.php");
    assert!(user.contains(
        "use Illuminate\\Notifications\\Notifiable;\nuse Laravel\\Sanctum\\HasApiTokens;\n"
    ));
    assert!(user.contains("    use HasApiTokens, HasFactory, Notifiable;\n"));

    let bootstrap = scaffold.read("bootstrap/app.php");
    assert!(!bootstrap.contains("routes/web.php"));
    assert!(bootstrap.contains("health: '/up',"));

    assert_eq!(
        scaffold.read("tests/Feature/ExampleTest.php"),
        Stub::ApiExampleTest.contents()
    );

    let events = log.events();
    assert_eq!(
        events.first(),
        Some(&Event::HookRan {
            hook: "install-api".to_string()
        })
    );
    assert_eq!(
        events.last(),
        Some(&Event::Appended {
            path: PathBuf::from("routes/api.php")
        })
    );
    assert!(events.contains(&Event::Copied {
        path: PathBuf::from("routes/auth.php")
    }));
}

#[test]
fn api_conversion_keeps_pest_example_test() {
    let scaffold = Scaffold::pristine();
    scaffold.write("tests/Pest.php", "<?php\n\nuses(Tests\\TestCase::class);\n");

    let (outcome, log) = run(&scaffold, Variant::Api, &mut FakeInstaller::default());

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(scaffold.read("tests/Feature/ExampleTest.php"), EXAMPLE_TEST);
    assert!(log.events().contains(&Event::Skipped {
        path: PathBuf::from("tests/Feature/ExampleTest.php"),
        reason: "Using Pest".to_string(),
    }));
}

#[test]
fn failing_hook_aborts_before_deletion() {
    let scaffold = Scaffold::pristine();
    let root = scaffold.root();
    let plan = plan_for(Variant::Api);
    let before = scaffold.snapshot();

    let mut hooks = FakeInstaller {
        fail_on: Some(Hook::InstallApi),
        ..FakeInstaller::default()
    };
    let err = Pipeline::new(&root, &plan)
        .run(&mut hooks, &mut EventLog::new())
        .expect_err("hook failure");

    match err {
        Error::Hook { hook, .. } => assert_eq!(hook, "install-api"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(scaffold.snapshot(), before);
}

#[test]
fn check_has_no_side_effects() {
    let scaffold = Scaffold::pristine();
    let root = scaffold.root();
    let before = scaffold.snapshot();

    for variant in [Variant::Api, Variant::Console] {
        let plan = plan_for(variant);
        let pipeline = Pipeline::new(&root, &plan);
        assert!(pipeline.check(&mut slim_scaffold::FsProbe::default()));
    }
    assert_eq!(scaffold.snapshot(), before);
}

#[test]
fn missing_example_test_is_not_recreated() {
    let scaffold = Scaffold::pristine();
    scaffold.remove("tests/Feature/ExampleTest.php");

    let (outcome, log) = run(&scaffold, Variant::Api, &mut FakeInstaller::default());

    assert_eq!(outcome, Outcome::Completed);
    assert!(!scaffold.exists("tests/Feature/ExampleTest.php"));
    assert!(log.events().contains(&Event::Skipped {
        path: PathBuf::from("tests/Feature/ExampleTest.php"),
        reason: "tests/Feature/ExampleTest.php not found".to_string(),
    }));
}
