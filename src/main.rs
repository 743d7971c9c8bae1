use std::{env, path::PathBuf, sync::mpsc, thread};

use kontrol_z1::{
    usb::RusbBus,
    z1_controller::{
        brightness_status, descriptors::LED_METER_LEFT, descriptors::LED_METER_RIGHT,
        descriptors::LED_METER_SEGMENTS, dual_color_status, ButtonId, KontrolZ1, SliderId,
        LED_BRIGHT, LED_DIM,
    },
    ControllerDevice, Z1Config, Z1Event, Z1Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Z1Result<()> {
    let config_path = env::args_os().nth(1).map(PathBuf::from);
    let config = Z1Config::load(config_path.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let bus = RusbBus::new(config.read_timeout(), config.write_timeout())?;

    let (tx, rx) = mpsc::channel::<Z1Event>();
    let mut controller = KontrolZ1::connect(&bus, move |event| {
        let _ = tx.send(event);
    })?;

    let info = controller.info();
    info!("{} {} ready", info.vendor, info.device);

    // Start from a known frame.
    controller.light_flush(true);

    loop {
        if let Err(err) = controller.poll() {
            error!("poll failed: {err}");
            break;
        }

        while let Ok(event) = rx.try_recv() {
            log_event(&controller, event);
            if config.echo_lights {
                echo_lights(&mut controller, event);
            }
        }

        controller.light_flush(false);
        thread::sleep(config.poll_interval());
    }

    controller.disconnect();
    Ok(())
}

fn log_event(controller: &impl ControllerDevice, event: Z1Event) {
    let name = controller
        .info()
        .control_name(event.kind(), event.id())
        .unwrap_or("<unknown>");
    match event {
        Z1Event::Slider { value, .. } => info!("{name}: {value:.3}"),
        Z1Event::Button { pressed, .. } => {
            info!("{name}: {}", if pressed { "pressed" } else { "released" })
        }
    }
}

fn echo_lights(controller: &mut impl ControllerDevice, event: Z1Event) {
    match event {
        Z1Event::Button { id, pressed } => {
            let Some(button) = ButtonId::from_index(id) else {
                return;
            };
            let status = match button {
                ButtonId::FxOnLeft | ButtonId::FxOnRight if pressed => {
                    dual_color_status(LED_BRIGHT, 0)
                }
                ButtonId::FxOnLeft | ButtonId::FxOnRight => dual_color_status(0, LED_DIM),
                _ if pressed => brightness_status(LED_BRIGHT),
                _ => brightness_status(LED_DIM),
            };
            controller.light_set(button.led(), status);
        }
        Z1Event::Slider { id, value } => {
            let base = match SliderId::from_index(id) {
                Some(SliderId::LeftFader) => LED_METER_LEFT,
                Some(SliderId::RightFader) => LED_METER_RIGHT,
                _ => return,
            };
            let lit = meter_segments(value);
            for segment in 0..LED_METER_SEGMENTS {
                let brightness = if segment < lit { LED_BRIGHT } else { 0 };
                controller.light_set(base + segment, brightness_status(brightness));
            }
        }
    }
}

fn meter_segments(value: f32) -> u32 {
    (value.clamp(0.0, 1.0) * LED_METER_SEGMENTS as f32).round() as u32
}
