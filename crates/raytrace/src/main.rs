use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use render::rgb;
use scene::Scene;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Renders a scene description into an image.
#[derive(argh::FromArgs)]
struct Args {
    /// scene description to render
    #[argh(positional)]
    scene: PathBuf,

    /// image to write, defaults to the scene's `output` directive
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// log every directive as it is applied
    #[argh(switch, short = 'v')]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber =
        FmtSubscriber::builder().with_max_level(level).with_writer(io::stderr).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let parsed = Scene::open(&args.scene)?;
    if !parsed.warnings.is_empty() {
        info!("skipped {} directives", parsed.warnings.len());
    }
    let scene = parsed.scene;

    let buf = render::render(&scene).context("rendering")?;

    let output = args.output.unwrap_or_else(|| PathBuf::from(&scene.output));
    info!("saving image to {}", output.display());
    write_image(&buf, &output).with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

fn write_image(buf: &rgb::Buf, path: &Path) -> anyhow::Result<()> {
    if path.extension().is_some_and(|it| it.eq_ignore_ascii_case("ppm")) {
        let mut w = BufWriter::new(File::create(path)?);
        write_ppm(buf, &mut w)?;
        w.flush()?;
    } else {
        to_image(buf).save(path)?;
    }
    Ok(())
}

/// Image rows go top to bottom, buffer rows bottom to top.
fn to_image(buf: &rgb::Buf) -> image::RgbImage {
    let height = buf.height();
    image::RgbImage::from_fn(buf.width(), height, |x, y| {
        image::Rgb(buf[[x, height - 1 - y]].to_array())
    })
}

fn write_ppm(buf: &rgb::Buf, w: &mut dyn io::Write) -> io::Result<()> {
    let magic_number = "P3";
    let max_color = 255;
    write!(w, "{}\n{} {}\n{}\n", magic_number, buf.width(), buf.height(), max_color)?;

    for [x, y] in buf.by_row() {
        if x == 0 && y > 0 {
            writeln!(w)?;
        }
        let rgb::Color { r, g, b } = buf[[x, buf.height() - 1 - y]];
        write!(w, "{r:3} {g:3} {b:3}  ")?;
    }
    writeln!(w)
}
