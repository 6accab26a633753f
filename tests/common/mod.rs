#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use slim_scaffold::ProjectRoot;

pub const BOOTSTRAP_APP: &str = r#"<?php

use Illuminate\Foundation\Application;
use Illuminate\Foundation\Configuration\Exceptions;
use Illuminate\Foundation\Configuration\Middleware;

return Application::configure(basePath: dirname(__DIR__))
    ->withRouting(
        web: __DIR__.'/../routes/web.php',
        commands: __DIR__.'/../routes/console.php',
        health: '/up',
    )
    ->withMiddleware(function (Middleware $middleware) {
        //
    })
    ->withExceptions(function (Exceptions $exceptions) {
        //
    })->create();
"#;

pub const BOOTSTRAP_APP_CONSOLE: &str = r#"<?php

use Illuminate\Foundation\Application;
use Illuminate\Foundation\Configuration\Exceptions;

return Application::configure(basePath: dirname(__DIR__))
    ->withRouting(
        commands: __DIR__.'/../routes/console.php',
    )
    ->withExceptions(function (Exceptions $exceptions) {
        //
    })->create();
"#;

pub const USER_MODEL: &str = r#"<?php

namespace App\Models;

// use Illuminate\Contracts\Auth\MustVerifyEmail;
use Illuminate\Database\Eloquent\Factories\HasFactory;
use Illuminate\Foundation\Auth\User as Authenticatable;
use Illuminate\Notifications\Notifiable;

class User extends Authenticatable
{
    use HasFactory, Notifiable;

    protected $fillable = [
        'name',
        'email',
        'password',
    ];
}
"#;

pub const EXAMPLE_TEST: &str = r#"<?php

namespace Tests\Feature;

// use Illuminate\Foundation\Testing\RefreshDatabase;
use Tests\TestCase;

class ExampleTest extends TestCase
{
    /**
     * A basic test example.
     */
    public function test_the_application_returns_a_successful_response(): void
    {
        $response = $this->get('/');

        $response->assertStatus(200);
    }
}
"#;

const PROVIDERS: &str = r#"<?php

return [
    App\Providers\AppServiceProvider::class,
];
"#;

const CONTROLLER: &str = r#"<?php

namespace App\Http\Controllers;

abstract class Controller
{
    //
}
"#;

const WEB_ROUTES: &str = r#"<?php

use Illuminate\Support\Facades\Route;

Route::get('/', function () {
    return view('welcome');
});
"#;

const FILES: &[(&str, &str)] = &[
    ("bootstrap/app.php", BOOTSTRAP_APP),
    ("bootstrap/providers.php", PROVIDERS),
    ("app/Http/Controllers/Controller.php", CONTROLLER),
    ("app/Models/User.php", USER_MODEL),
    ("app/Providers/AppServiceProvider.php", "<?php\n\nnamespace App\\Providers;\n"),
    ("config/app.php", "<?php\n\nreturn [];\n"),
    ("config/auth.php", "<?php\n\nreturn [];\n"),
    ("config/database.php", "<?php\n\nreturn [];\n"),
    ("config/mail.php", "<?php\n\nreturn [];\n"),
    ("config/queue.php", "<?php\n\nreturn [];\n"),
    ("config/session.php", "<?php\n\nreturn [];\n"),
    ("database/migrations/0001_01_01_000000_create_users_table.php", "<?php\n"),
    ("database/database.sqlite", ""),
    ("public/index.php", "<?php\n"),
    ("public/favicon.ico", ""),
    ("resources/views/welcome.blade.php", "<html></html>\n"),
    ("resources/css/app.css", ""),
    ("routes/web.php", WEB_ROUTES),
    ("routes/console.php", "<?php\n"),
    ("tests/TestCase.php", "<?php\n"),
    ("tests/Feature/ExampleTest.php", EXAMPLE_TEST),
    ("package.json", "{\n    \"private\": true\n}\n"),
    ("vite.config.js", "export default {};\n"),
    ("node_modules/.package-lock.json", "{}\n"),
    ("artisan", "#!/usr/bin/env php\n<?php\n"),
];

/// A freshly generated project in a temporary directory.
pub struct Scaffold {
    dir: tempfile::TempDir,
}

impl Scaffold {
    pub fn pristine() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        for (relative, contents) in FILES {
            write_file(dir.path(), relative, contents);
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn root(&self) -> ProjectRoot {
        ProjectRoot::new(self.dir.path()).expect("project root")
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, contents: &str) {
        write_file(self.dir.path(), relative, contents);
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.join(relative)).expect("read")
    }

    pub fn remove(&self, relative: &str) {
        let path = self.join(relative);
        if path.is_dir() {
            std::fs::remove_dir_all(path).expect("remove dir");
        } else {
            std::fs::remove_file(path).expect("remove file");
        }
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.join(relative).exists()
    }

    pub fn snapshot(&self) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
        snapshot(self.dir.path())
    }
}

pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("mkdir");
    }
    std::fs::write(path, contents).expect("write");
}

/// Every entry under `root` with file contents; directories map to `None`.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
    walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| {
            let entry = entry.expect("walk entry");
            let relative = entry
                .path()
                .strip_prefix(root)
                .expect("under root")
                .to_path_buf();
            let contents = if entry.file_type().is_file() {
                Some(std::fs::read(entry.path()).expect("read"))
            } else {
                None
            };
            (relative, contents)
        })
        .collect()
}
