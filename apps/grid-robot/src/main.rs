//! Headless robot for the lazy grid.
//!
//! Drives a photo-feed style grid (wide banners, tall cards, variable item
//! lengths) through scripted scrolls, jumps and data changes, printing the
//! realized window after every pass and failing on the first broken
//! expectation.
//!
//! Run with `RUST_LOG=cranpose_lazy_grid=debug` to see skip and reset decisions.

use anyhow::{ensure, Context, Result};
use cranpose_lazy_grid::{
    measure_lazy_grid, GridCell, GridItemProvider, GridLayoutState, GridMeasureConfig,
    GridMeasureMode, GridMeasureResult, GridSpan, GridTracks, ScrollAlign,
};

const VIEWPORT_HEIGHT: f32 = 700.0;
const VIEWPORT_WIDTH: f32 = 500.0;
const MIN_TRACK_WIDTH: f32 = 150.0;
const SPACING: f32 = 8.0;

/// Item source with a mutable count, like a paged feed.
struct PhotoFeed {
    count: usize,
}

impl GridItemProvider for PhotoFeed {
    fn item_count(&self) -> usize {
        self.count
    }

    fn span(&self, index: usize) -> GridSpan {
        match index % 17 {
            0 => GridSpan::cross(2),
            6 => GridSpan::main(2),
            11 => GridSpan::new(2, 2),
            _ => GridSpan::SINGLE,
        }
    }
}

/// Height cycles through 96, 112, 128, 144, 160; tall cards are taller.
fn item_height(index: usize) -> f32 {
    let base = 96.0 + (index % 5) as f32 * 16.0;
    match index % 17 {
        6 | 11 => base * 2.0 + SPACING,
        _ => base,
    }
}

struct GridRobot {
    state: GridLayoutState,
    feed: PhotoFeed,
    config: GridMeasureConfig,
    pass: usize,
}

impl GridRobot {
    fn new(count: usize, width: f32) -> Self {
        Self {
            state: GridLayoutState::new(),
            feed: PhotoFeed { count },
            config: config_for_width(width),
            pass: 0,
        }
    }

    fn measure(&mut self) -> GridMeasureResult {
        self.pass += 1;
        let result = measure_lazy_grid(
            &mut self.state,
            &self.feed,
            VIEWPORT_HEIGHT,
            &self.config,
            |index, _| item_height(index),
        );
        println!(
            "  pass {:>3} {:<8} items {:>5}..={:<5} lines {:>4}..={:<4} offset {:>8.1} \
             start={} end={} pinned={}",
            self.pass,
            format!("{:?}", result.mode),
            result.start_index,
            result.end_index,
            result.start_main_line_index,
            result.end_main_line_index,
            result.current_offset,
            result.reach_start,
            result.reach_end,
            result.offset_end,
        );
        result
    }

    fn scroll(&mut self, delta: f32) -> GridMeasureResult {
        self.state.dispatch_scroll_delta(delta);
        self.measure()
    }

    fn jump(&mut self, index: usize, align: ScrollAlign) -> GridMeasureResult {
        self.state.scroll_to_item(index, align);
        self.measure()
    }

    /// The start item must own the origin cell of the start line.
    fn check_start_cell(&self) -> Result<()> {
        let start = self.state.start_index();
        let placement = self
            .state
            .matrix()
            .placement(start)
            .with_context(|| format!("start item {start} is not placed"))?;
        let cell = self
            .state
            .matrix()
            .cell(self.state.start_main_line_index(), placement.track);
        ensure!(
            cell == GridCell::Item(start),
            "start cell is {:?}, expected item {}",
            cell,
            start
        );
        Ok(())
    }
}

fn config_for_width(width: f32) -> GridMeasureConfig {
    GridMeasureConfig::default()
        .with_tracks(GridTracks::adaptive(MIN_TRACK_WIDTH, width, SPACING))
        .with_spacing(SPACING, SPACING)
}

fn scenario_scroll_through() -> Result<()> {
    println!("=== Scroll through the first screens ===");
    let mut robot = GridRobot::new(10_000, VIEWPORT_WIDTH);
    let first = robot.measure();
    ensure!(first.reach_start, "first pass must start at the top");
    ensure!(
        robot.config.cross_count() == 3,
        "expected 3 tracks, got {}",
        robot.config.cross_count()
    );

    for _ in 0..12 {
        let result = robot.scroll(-173.0);
        ensure!(
            result.mode == GridMeasureMode::Forward,
            "small scroll took {:?}",
            result.mode
        );
        robot.check_start_cell()?;
    }
    for _ in 0..12 {
        robot.scroll(173.0);
        robot.check_start_cell()?;
    }
    ensure!(robot.state.reach_start(), "scrolling back must return to the top");
    ensure!(
        robot.state.current_offset() == 0.0,
        "offset after returning is {}",
        robot.state.current_offset()
    );
    Ok(())
}

fn scenario_jumps() -> Result<()> {
    println!("=== Jump to items ===");
    let mut robot = GridRobot::new(10_000, VIEWPORT_WIDTH);
    robot.measure();

    for (target, align) in [
        (5_000, ScrollAlign::Center),
        (9_999, ScrollAlign::End),
        (0, ScrollAlign::Start),
        (2_718, ScrollAlign::Auto),
    ] {
        let result = robot.jump(target, align);
        let item = result
            .visible_items
            .iter()
            .find(|item| item.index == target)
            .with_context(|| format!("item {target} not visible after {align:?} jump"))?;
        ensure!(
            item.main_axis_offset >= -0.5
                && item.main_axis_offset + item.main_axis_size <= VIEWPORT_HEIGHT + 0.5,
            "item {} at {}..{} is not fully visible",
            target,
            item.main_axis_offset,
            item.main_axis_offset + item.main_axis_size
        );
        robot.check_start_cell()?;
    }

    let result = robot.jump(9_999, ScrollAlign::Start);
    ensure!(result.offset_end, "jump to the last item must pin the end");
    Ok(())
}

fn scenario_fling() -> Result<()> {
    println!("=== Fling far without measuring the way ===");
    let mut robot = GridRobot::new(100_000, VIEWPORT_WIDTH);
    robot.measure();

    let result = robot.scroll(-400_000.0);
    ensure!(
        result.mode == GridMeasureMode::Skip,
        "large fling took {:?}",
        result.mode
    );
    let measured = robot.state.line_heights().len();
    ensure!(
        measured < 64,
        "fling measured {} lines, expected only the landing window",
        measured
    );
    robot.check_start_cell()?;

    let result = robot.scroll(400_000.0);
    ensure!(
        result.start_index < 5_000,
        "fling back landed at item {}",
        result.start_index
    );
    Ok(())
}

fn scenario_resize_and_append() -> Result<()> {
    println!("=== Resize and append ===");
    let mut robot = GridRobot::new(500, VIEWPORT_WIDTH);
    robot.measure();
    robot.jump(240, ScrollAlign::Start);
    let anchor = robot.state.start_index();

    robot.config = config_for_width(VIEWPORT_WIDTH * 2.0);
    let result = robot.measure();
    ensure!(
        result.start_index <= anchor && anchor <= result.end_index,
        "resize lost start item {}, window {}..={}",
        anchor,
        result.start_index,
        result.end_index
    );
    robot.check_start_cell()?;

    robot.jump(499, ScrollAlign::End);
    robot.state.notify_children_updated(robot.feed.count);
    robot.feed.count += 40;
    let result = robot.scroll(-2_000.0);
    ensure!(
        result.end_index > 499,
        "appended items were not reached, end {}",
        result.end_index
    );

    robot.feed.count = 0;
    let result = robot.measure();
    ensure!(
        result.visible_items.is_empty() && robot.state.start_index() == 0,
        "empty feed must reset the grid"
    );
    Ok(())
}

fn main() -> Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let scenarios: [(&str, fn() -> Result<()>); 4] = [
        ("scroll_through", scenario_scroll_through),
        ("jumps", scenario_jumps),
        ("fling", scenario_fling),
        ("resize_and_append", scenario_resize_and_append),
    ];
    for (name, scenario) in scenarios {
        log::info!("running scenario {}", name);
        scenario().with_context(|| format!("scenario {name} failed"))?;
    }

    println!("=== All grid scenarios passed ===");
    Ok(())
}
