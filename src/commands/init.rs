//! Initialize a new blog

use anyhow::Result;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# inkpost configuration

# Site
title: My Blog
description: A personal blog of learning notes and experiments.
url: https://example.com
language: en-us
author: Anonymous

# Directory
content_dir: content/blogs
public_dir: public

# Writing
words_per_minute: 200
excerpt_length: 160
strict_slugs: false
raw_html: true

# Feed
# feed_limit: 20

# Category display names (slug: name)
category_names:
  notes: Notes & Learnings
"#;

/// Initialize a new blog in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Already initialized: {:?}", config_path);
    }

    // Create directory structure
    let notes_dir = target_dir.join("content/blogs/notes");
    fs::create_dir_all(&notes_dir)?;

    fs::write(&config_path, DEFAULT_CONFIG)?;

    // Create a sample post
    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
description: The first post on this blog.
date: {}
tags:
  - meta
---

Welcome! Posts live in `content/blogs/<category>/<slug>.md`.

## Writing a post

```bash
$ inkpost new "My New Post" --category notes
```

## Publishing

```bash
$ inkpost generate
```

This writes `feed.xml`, `sitemap.xml` and `search.json` into `public/`.
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(notes_dir.join("hello-world.md"), sample_post)?;

    Ok(())
}
