use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::prelude::{
    targets, Config, GeoPoint, Interpolator, InverseDistance, LocationSource, MapOverlay, Padding,
    Projection, RenderEvent, Renderer, SampleStore, ScanResult, Signal, SignalSource, Survey,
    SurveyEvent,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Default)]
struct Walk {
    fixes: VecDeque<GeoPoint>,
    last: Option<GeoPoint>,
}

impl LocationSource for Walk {
    fn next(&mut self) -> Option<GeoPoint> {
        let fix = self.fixes.pop_front()?;
        self.last = Some(fix);
        Some(fix)
    }
    fn last_known(&self) -> Option<GeoPoint> {
        self.last
    }
}

#[derive(Default)]
struct Scanner {
    scans: VecDeque<Vec<ScanResult>>,
}

impl SignalSource for Scanner {
    fn next(&mut self) -> Option<Vec<ScanResult>> {
        self.scans.pop_front()
    }
}

fn scan(home: Option<i32>) -> Vec<ScanResult> {
    let mut results = vec![
        ScanResult::new("", "00:11:22:33:44:55", -70),
        ScanResult::new("neighbor", "66:77:88:99:aa:bb", -81),
    ];
    if let Some(level) = home {
        results.push(ScanResult::new("home", "cc:dd:ee:ff:00:11", level));
    }
    results
}

#[test]
fn midpoint_estimate() {
    let samples = [
        (GeoPoint::new(0.0, 0.0), -40),
        (GeoPoint::new(0.0, 0.001), -80),
    ];
    let proj = Projection::plan(
        samples.iter().map(|(point, _)| point),
        &Padding::default(),
        128,
    )
    .unwrap();

    let idw = InverseDistance::new(
        3.0,
        samples
            .iter()
            .map(|(point, level)| (proj.pixel(point), *level)),
    );
    assert_eq!(idw.len(), 2);

    let (x0, y0) = proj.pixel(&samples[0].0);
    let (x1, y1) = proj.pixel(&samples[1].0);
    assert_eq!(y0, y1);
    assert!(x1 > x0);

    let (mx, my) = ((x0 + x1) / 2, y0);
    let estimate = idw
        .interpolate(mx as f64, my as f64)
        .level()
        .unwrap();

    assert!(estimate > -80 && estimate < -40, "estimate {}", estimate);

    let (d0, d1) = ((mx - x0).abs(), (x1 - mx).abs());
    if d0 < d1 {
        assert!(estimate > -60, "estimate {} should lean to -40", estimate);
    } else if d1 < d0 {
        assert!(estimate < -60, "estimate {} should lean to -80", estimate);
    }
}

#[test]
fn survey_walk() {
    init_logger();
    let cfg = Config::default();
    let store = Arc::new(SampleStore::new());

    let mut survey = Survey::new(&cfg, store.clone()).unwrap();
    let renderer = Arc::new(Mutex::new(Renderer::new(&cfg, store.clone()).unwrap()));
    let mut overlay = MapOverlay::new(&cfg.marker);

    // new samples trigger a build
    let trigger = renderer.clone();
    survey.subscribe(move |event: &SurveyEvent| {
        if let SurveyEvent::DataUpdated(data) = event {
            if !data.is_empty() {
                trigger.lock().unwrap().request().unwrap();
            }
        }
    });

    let updates = Arc::new(Mutex::new(Vec::<usize>::new()));
    let sink = updates.clone();
    survey.subscribe(move |event: &SurveyEvent| {
        if let SurveyEvent::DataUpdated(data) = event {
            sink.lock().unwrap().push(data.len());
        }
    });

    let mut walk = Walk {
        last: Some(GeoPoint::new(45.0, 7.0)),
        ..Default::default()
    };
    let mut scanner = Scanner::default();

    survey.start(&walk);

    let visible = targets(&scan(Some(-40)));
    assert_eq!(
        visible,
        vec![
            "00:11:22:33:44:55".to_string(),
            "neighbor".to_string(),
            "home".to_string(),
        ]
    );
    survey.survey_target("home");

    for i in 0..10 {
        scanner.scans.push_back(scan(Some(-40 - 4 * i)));
        walk.fixes
            .push_back(GeoPoint::new(45.0 + i as f64 * 2.0E-5, 7.0));
        assert_eq!(survey.consume(&mut walk, &mut scanner), 1);
    }

    // out of range: not recorded
    scanner.scans.push_back(scan(None));
    walk.fixes.push_back(GeoPoint::new(45.001, 7.0));
    assert_eq!(survey.consume(&mut walk, &mut scanner), 0);

    assert_eq!(store.len(), 10);
    assert_eq!(survey.last_signal(), Signal::NoSignal);
    assert_eq!(
        survey.status().map(|status| status.to_string()),
        Some("home is out of range".to_string())
    );
    assert_eq!(updates.lock().unwrap().last(), Some(&10));

    let mut renderer = renderer.lock().unwrap();
    let heatmap = loop {
        match renderer.wait(Duration::from_secs(30)) {
            Some(RenderEvent::Done(heatmap)) if heatmap.samples == 10 => break heatmap,
            Some(_) => continue,
            None => panic!("renderer timed out"),
        }
    };

    let raster = &heatmap.raster;
    assert_eq!(
        raster.to_rgba8().len(),
        (raster.width() * raster.height() * 4) as usize
    );
    assert_eq!(raster.coverage(), (raster.width() * raster.height()) as usize);

    let levels = heatmap
        .legend
        .iter()
        .map(|entry| entry.level)
        .collect::<Vec<_>>();
    assert_eq!(levels, vec![-40, -49, -58, -67, -76]);

    overlay.handle(&RenderEvent::Done(heatmap.clone()));
    let ground = overlay.ground().unwrap();
    assert_eq!(ground.z_index, 10);
    for point in store.snapshot().points() {
        assert!(ground.bounds.contains(point));
    }

    assert_eq!(overlay.new_markers(&store.snapshot()).len(), 10);
    assert!(overlay.new_markers(&store.snapshot()).is_empty());

    renderer.stop();
    survey.stop();
}
